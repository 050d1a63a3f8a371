use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntoEntryNameError {
    EmptyName,
    NoFileName,
    UnrepresentableStr,
    TooLong(usize),
    ReservedName,
    ForbiddenByte(u8),
}

impl std::error::Error for IntoEntryNameError {}

impl fmt::Display for IntoEntryNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntoEntryNameError::TooLong(len) => write!(
                f,
                "name is {} bytes long, at most {} allowed",
                len,
                super::MAX_NAME_LEN
            ),
            IntoEntryNameError::ForbiddenByte(b) => {
                write!(f, "name contains forbidden byte {:?}", char::from(*b))
            }
            _ => write!(f, "{}", self.as_str()),
        }
    }
}

impl IntoEntryNameError {
    pub fn as_str(&self) -> &str {
        match self {
            IntoEntryNameError::EmptyName => "no name provided",
            IntoEntryNameError::NoFileName => "path has no file name component",
            IntoEntryNameError::UnrepresentableStr => "unrepresentable string found in name",
            IntoEntryNameError::TooLong(_) => "name is too long",
            IntoEntryNameError::ReservedName => "`.` and `..` cannot be used as names",
            IntoEntryNameError::ForbiddenByte(_) => "name contains a forbidden byte",
        }
    }
}
