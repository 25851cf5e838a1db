use std::{fmt, ops::Deref, sync::Arc};

use crate::ArgumentError;

/// Opaque serialized message published alongside an event.
///
/// The bytes are shared behind an `Arc`, so handing the same payload to
/// every handler of an event does not copy it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Payload(Arc<[u8]>);

impl Payload {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Serialize `value` to JSON.
    #[cfg(feature = "serde")]
    pub fn from_json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_vec(value).map(Self::from)
    }

    /// Deserialize the payload as JSON.
    ///
    /// ```rust
    /// use eventbus::Payload;
    ///
    /// #[derive(serde::Deserialize)]
    /// struct Created {
    ///     #[serde(rename = "Message")]
    ///     message: String,
    /// }
    ///
    /// let payload = Payload::from(r#"{"Message":"user 1 created"}"#);
    /// let created: Created = payload.to_json().unwrap();
    /// assert_eq!(created.message, "user 1 created");
    /// ```
    #[cfg(feature = "serde")]
    pub fn to_json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.0)
    }
}

impl Deref for Payload {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Arc::from(bytes))
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self(Arc::from(bytes))
    }
}

impl<const N: usize> From<&[u8; N]> for Payload {
    fn from(bytes: &[u8; N]) -> Self {
        Self(Arc::from(&bytes[..]))
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self(Arc::from(s.as_bytes()))
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self(Arc::from(s.into_bytes()))
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => write!(f, "Payload({s:?})"),
            Err(_) => write!(f, "Payload({} bytes)", self.0.len()),
        }
    }
}

/// Pluggable payload validity check.
///
/// Runs on `publish` and once more on the worker right before the handlers
/// are invoked. Any `Fn(&Payload) -> Result<(), ArgumentError>` closure is a
/// validator too.
pub trait Validator: Send + Sync + 'static {
    fn validate(&self, payload: &Payload) -> Result<(), ArgumentError>;
}

impl<F> Validator for F
where
    F: Fn(&Payload) -> Result<(), ArgumentError> + Send + Sync + 'static,
{
    fn validate(&self, payload: &Payload) -> Result<(), ArgumentError> {
        self(payload)
    }
}

/// Default validator: any non-empty byte sequence is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmpty;

impl Validator for NonEmpty {
    fn validate(&self, payload: &Payload) -> Result<(), ArgumentError> {
        if payload.is_empty() {
            return Err(ArgumentError::EmptyPayload);
        }
        Ok(())
    }
}

/// Accepts non-empty payloads that parse as a single JSON value.
///
/// The document is only checked for syntax; nothing is allocated for its contents.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonValidator;

#[cfg(feature = "serde")]
impl Validator for JsonValidator {
    fn validate(&self, payload: &Payload) -> Result<(), ArgumentError> {
        NonEmpty.validate(payload)?;
        serde_json::from_slice::<serde::de::IgnoredAny>(payload)
            .map(|_| ())
            .map_err(|e| ArgumentError::MalformedPayload(e.to_string().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(
            NonEmpty.validate(&Payload::from("")),
            Err(ArgumentError::EmptyPayload)
        );
        assert!(NonEmpty.validate(&Payload::from("not json at all")).is_ok());
        assert!(NonEmpty.validate(&Payload::from(&[0u8])).is_ok());
    }

    #[test]
    fn test_closure_validator() {
        let only_ascii = |p: &Payload| {
            if p.is_ascii() {
                Ok(())
            } else {
                Err(ArgumentError::MalformedPayload("non-ascii".into()))
            }
        };
        assert!(only_ascii.validate(&Payload::from("abc")).is_ok());
        assert!(only_ascii.validate(&Payload::from(vec![0xff])).is_err());
    }

    #[test]
    fn test_debug_output() {
        assert_eq!(format!("{:?}", Payload::from("hi")), r#"Payload("hi")"#);
        assert_eq!(format!("{:?}", Payload::from(vec![0xff, 0xfe])), "Payload(2 bytes)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_validator() {
        assert!(JsonValidator.validate(&Payload::from(r#"{"Message":"x"}"#)).is_ok());
        assert!(JsonValidator.validate(&Payload::from("42")).is_ok());
        assert_eq!(
            JsonValidator.validate(&Payload::from("")),
            Err(ArgumentError::EmptyPayload)
        );
        assert!(matches!(
            JsonValidator.validate(&Payload::from(r#"{"Message":"#)),
            Err(ArgumentError::MalformedPayload(_))
        ));
        assert!(JsonValidator.validate(&Payload::from("{} {}")).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_helpers() {
        #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
        struct Deleted {
            #[serde(rename = "Name")]
            name: String,
        }

        let payload = Payload::from_json(&Deleted { name: "user 1".into() }).unwrap();
        assert_eq!(payload.as_bytes(), br#"{"Name":"user 1"}"#);
        assert_eq!(
            payload.to_json::<Deleted>().unwrap(),
            Deleted { name: "user 1".into() }
        );
    }
}
