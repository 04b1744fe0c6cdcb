use hey_lens::LensError;

pub const SOMETHING_WENT_WRONG: &str = "Something went wrong!";

/// Transient user-facing notifications.
pub trait Toaster: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

impl<T: Toaster + ?Sized> Toaster for std::sync::Arc<T> {
    fn success(&self, message: &str) {
        (**self).success(message)
    }

    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

/// Show an error toast for a failed API call.
///
/// Prefers the message the API sent back, then the error itself. HTTP status
/// errors get the generic message.
pub fn error_toast(toaster: &dyn Toaster, error: &LensError) {
    let message = match (error.user_message(), error) {
        (Some(message), _) => message.to_string(),
        (None, LensError::Status { .. }) => String::new(),
        (None, error) => error.to_string(),
    };

    if message.trim().is_empty() {
        toaster.error(SOMETHING_WENT_WRONG);
    } else {
        toaster.error(&message);
    }
}
