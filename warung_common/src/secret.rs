use std::{
    fmt,
    fmt::{Debug, Display},
};

/// A thin wrapper that keeps sensitive values (API keys, signing secrets) out of logs.
///
/// Both `Debug` and `Display` render as `****`. Call [`Secret::reveal`] at the point where the
/// underlying value is actually needed.
#[derive(Clone, Default)]
pub struct Secret<T>
where T: Clone + Default
{
    value: T,
}

impl<T: Clone + Default> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn reveal(&self) -> &T {
        &self.value
    }
}

impl<T: Clone + Default> Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl<T: Clone + Default> Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

#[cfg(test)]
mod test {
    use super::Secret;

    #[test]
    fn never_leaks_in_format_output() {
        let secret = Secret::new("hunter2".to_string());
        assert_eq!(format!("{secret}"), "****");
        assert_eq!(format!("{secret:?}"), "****");
        assert_eq!(secret.reveal(), "hunter2");
    }
}
