use std::{error::Error as StdError, fmt};

/// A `Result` alias where the `Err` case is `h2fingerprint::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// A boxed error type that can be used for dynamic error handling.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// The Errors that may occur when ingesting or translating a fingerprint
/// description.
///
/// Every error is fatal to the connection attempt that asked for the
/// fingerprint. Falling back to some default fingerprint would defeat the
/// point of emulating one, so none of these are recoverable locally.
///
/// When the error can be tied to a location in the description, the dotted
/// path of that location is available through [`field`](Error::field), e.g.
/// `priorityFrames[1].priorityParam.exclusive`.
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
    field: Option<String>,
}

impl Error {
    pub(crate) fn new<E>(kind: Kind, source: Option<E>) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            inner: Box::new(Inner {
                kind,
                source: source.map(Into::into),
                field: None,
            }),
        }
    }

    pub(crate) fn type_mismatch<E: Into<BoxError>>(e: E) -> Error {
        Error::new(Kind::TypeMismatch, Some(e))
    }

    pub(crate) fn missing_field(field: &str) -> Error {
        Error::new(Kind::MissingField, None::<Error>).with_field(field)
    }

    pub(crate) fn invalid_description<E: Into<BoxError>>(e: E) -> Error {
        Error::new(Kind::InvalidDescription, Some(e))
    }

    pub(crate) fn out_of_range<E: Into<BoxError>>(e: E) -> Error {
        Error::new(Kind::OutOfRange, Some(e))
    }

    /// Prefixes the field path with the name of the enclosing structure.
    pub(crate) fn within(mut self, parent: &str) -> Self {
        self.inner.field = Some(match self.inner.field.take() {
            Some(field) if field.starts_with('[') => format!("{parent}{field}"),
            Some(field) => format!("{parent}.{field}"),
            None => parent.to_owned(),
        });
        self
    }
}

impl Error {
    /// Returns the path of the description field this error relates to, if any.
    pub fn field(&self) -> Option<&str> {
        self.inner.field.as_deref()
    }

    /// Add a field path related to this error (overwriting any existing)
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.inner.field = Some(field.into());
        self
    }

    /// Strip the related field path from this error.
    pub fn without_field(mut self) -> Self {
        self.inner.field = None;
        self
    }

    /// Returns true if a numeric or boolean field had the wrong type.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.inner.kind, Kind::TypeMismatch)
    }

    /// Returns true if a required field was absent.
    pub fn is_missing_field(&self) -> bool {
        matches!(self.inner.kind, Kind::MissingField)
    }

    /// Returns true if a nested structure did not have the expected shape.
    pub fn is_invalid_description(&self) -> bool {
        matches!(self.inner.kind, Kind::InvalidDescription)
    }

    /// Returns true if a value cannot be represented on the wire.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.inner.kind, Kind::OutOfRange)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut builder = f.debug_struct("h2fingerprint::Error");

        builder.field("kind", &self.inner.kind);

        if let Some(ref field) = self.inner.field {
            builder.field("field", field);
        }

        if let Some(ref source) = self.inner.source {
            builder.field("source", source);
        }

        builder.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner.kind {
            Kind::TypeMismatch => f.write_str("type mismatch")?,
            Kind::MissingField => f.write_str("missing required field")?,
            Kind::InvalidDescription => f.write_str("invalid fingerprint description")?,
            Kind::OutOfRange => f.write_str("value out of range")?,
        };

        if let Some(field) = &self.inner.field {
            write!(f, " at ({field})")?;
        }

        if let Some(e) = &self.inner.source {
            write!(f, ": {e}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

#[derive(Debug)]
pub(crate) enum Kind {
    TypeMismatch,
    MissingField,
    InvalidDescription,
    OutOfRange,
}
