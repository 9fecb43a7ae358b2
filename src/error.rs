use thiserror::Error;

/// Parameter and construction preconditions violated before any work began.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("unsupported signature algorithm identifier: {0}")]
    UnknownCdss(String),
    #[error("unsupported hash algorithm identifier: {0}")]
    UnknownHash(String),
    #[error("unsupported file type identifier: {0}")]
    UnknownFileType(String),
    #[error("unsupported CFF construction identifier: {0}")]
    UnknownCffMethod(String),
    #[error("unsupported CFF matrix representation identifier: {0}")]
    UnknownMatrixType(String),
    #[error("cover-free family requires d >= 1, got {0}")]
    InvalidD(u32),
    #[error("Sperner construction requires d = 1, got {0}")]
    SpernerRequiresDOne(u32),
    #[error("Steiner Triple System construction requires d = 2, got {0}")]
    StsRequiresDTwo(u32),
    #[error("Steiner Triple System construction requires n >= 7, got {0}")]
    StsRequiresNAtLeastSeven(u32),
    #[error("Reed-Solomon construction requires d >= 2, got {0}")]
    RsRequiresDAtLeastTwo(u32),
    #[error("fixed block count {k} does not divide the input into a consistent number of blocks (got {actual})")]
    BlockCountMismatch { k: usize, actual: usize },
}

/// Malformed external input (signature payload text, hex encodings, image headers).
#[derive(Debug, Error)]
pub enum InputError {
    #[error("signature payload must have exactly 11 lines, found {0}")]
    WrongLineCount(usize),
    #[error("signature payload field {0} is empty")]
    EmptyField(usize),
    #[error("hash tuple field has odd hex length: {0}")]
    OddHexLength(String),
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("invalid decimal integer field {field}: {value}")]
    InvalidInteger { field: &'static str, value: String },
    #[error("malformed PGM image header: {0}")]
    MalformedImageHeader(String),
    #[error("hash tuple has wrong length: expected {expected}, got {actual}")]
    WrongTupleLength { expected: usize, actual: usize },
    #[error("unsupported algorithm identifier in payload: {0}")]
    Param(#[from] ParamError),
}

/// A group-testing or finite-field invariant the implementation itself
/// discovered to be broken (distinct from a caller-supplied bad parameter).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("STS decoder observed 4 positive rows, which is structurally impossible for a Steiner Triple System")]
    ImpossiblePositiveCount,
    #[error("Reed-Solomon decoder could not construct a consistent codeword from the observed positives")]
    NoPolynomialFound,
    #[error("Reed-Solomon decoder hit a singular Vandermonde system recovering a polynomial's coefficients")]
    SingularVandermonde,
}

/// Top-level crate error, returned by the public sign/verify entry points.
#[derive(Debug, Error)]
pub enum MtssError {
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("underlying signature primitive failed: {0}")]
    Signature(String),
}

pub type Result<T> = std::result::Result<T, MtssError>;
