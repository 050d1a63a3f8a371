use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot create archive `{}`", .path.display())]
    CreateArchive {
        path: PathBuf,
        #[source]
        source: sau_format::BuildError,
    },

    #[error("Cannot open archive `{}`", .path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: sau_format::ExtractError,
    },

    #[error("Cannot extract archive `{}`", .path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: sau_format::ExtractError,
    },

    #[error("Cannot list archive `{}`", .path.display())]
    List {
        path: PathBuf,
        #[source]
        source: sau_format::ExtractError,
    },

    #[error("Cannot write listing")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}
