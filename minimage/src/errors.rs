#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Got an invalid parameter value in a function
    InvalidParameter(String),
    /// The parameters used to define a simulation box do not select exactly
    /// one complete group of parameters
    Configuration(String),
    /// Tried to access a quantity which is only defined for normalized
    /// simulation boxes
    Precondition(String),
    /// The lattice vectors of a simulation box are not linearly independent
    DegenerateBox(String),
    /// Tried to access an atom which does not exist
    OutOfRange {
        /// the requested atom index
        index: usize,
        /// the number of atoms available
        size: usize,
    },
    /// A persisted neighbor list is malformed
    Serialization(String),
    /// Error while serializing/deserializing JSON data
    Json(serde_json::Error),
    /// Error while reading or writing files
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidParameter(e) => write!(f, "invalid parameter: {}", e),
            Error::Configuration(e) => write!(f, "invalid box configuration: {}", e),
            Error::Precondition(e) => write!(f, "precondition failed: {}", e),
            Error::DegenerateBox(e) => write!(f, "degenerate simulation box: {}", e),
            Error::OutOfRange { index, size } => write!(
                f, "atom index out of range: got {} but there are {} atoms", index, size
            ),
            Error::Serialization(e) => write!(f, "malformed neighbor list: {}", e),
            Error::Json(e) => write!(f, "json error: {}", e),
            Error::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidParameter(_) |
            Error::Configuration(_) |
            Error::Precondition(_) |
            Error::DegenerateBox(_) |
            Error::OutOfRange { .. } |
            Error::Serialization(_) => None,
            Error::Json(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::Json(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Error {
        Error::Io(error)
    }
}

/// Check that `index` is a valid atom index for a collection of `size` atoms
pub(crate) fn check_index(index: usize, size: usize) -> Result<(), Error> {
    if index >= size {
        return Err(Error::OutOfRange { index, size });
    }
    return Ok(());
}
