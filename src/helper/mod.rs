pub mod gencrd;
