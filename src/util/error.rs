#[derive(Debug)]
pub enum ConversionError {
    MappingFailed(String),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::MappingFailed(reason) => {
                f.write_fmt(format_args!("MappingFailed: {}", reason))
            }
        }
    }
}
