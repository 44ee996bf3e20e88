//! Result type alias for PiiScope

use super::errors::PiiScopeError;

/// Result type alias for PiiScope operations
///
/// # Examples
///
/// ```
/// use piiscope::domain::result::Result;
/// use piiscope::domain::errors::PiiScopeError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PiiScopeError::Configuration("bad preset".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PiiScopeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DetectionError;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<usize> {
            Ok(3)
        }

        let value = inner()?;
        assert_eq!(value, 3);
        Ok(())
    }

    #[test]
    fn test_detection_error_propagates() {
        fn inner() -> Result<()> {
            let outcome: std::result::Result<(), DetectionError> =
                Err(DetectionError::TextTooLong { length: 2, max: 1 });
            outcome?;
            Ok(())
        }

        assert!(inner().is_err());
    }
}
