use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum BuildError {
    #[error("EmptyLandscape cannot chart an empty landscape")]
    EmptyLandscape,
}

#[derive(Error, Debug, PartialEq)]
pub enum ExcavateError {
    #[error("NothingLeft the landscape is fully excavated")]
    NothingLeft,
}
