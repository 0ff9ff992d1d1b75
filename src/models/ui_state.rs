/// Three-way result every screen-facing component exposes
#[derive(Debug, Clone, PartialEq)]
pub enum UiState<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> UiState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UiState::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, UiState::Error(_))
    }

    /// Payload of a `Success` state
    pub fn data(&self) -> Option<&T> {
        match self {
            UiState::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Message of an `Error` state
    pub fn error(&self) -> Option<&str> {
        match self {
            UiState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> UiState<U> {
        match self {
            UiState::Loading => UiState::Loading,
            UiState::Success(data) => UiState::Success(f(data)),
            UiState::Error(msg) => UiState::Error(msg),
        }
    }
}

impl<T> Default for UiState<T> {
    fn default() -> Self {
        UiState::Loading
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for UiState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => UiState::Success(data),
            Err(e) => UiState::Error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_and_map() {
        let state: UiState<u32> = UiState::Success(2);
        assert!(state.is_success());
        assert_eq!(state.data(), Some(&2));
        assert_eq!(state.map(|n| n * 10), UiState::Success(20));

        let state: UiState<u32> = UiState::Error("boom".to_string());
        assert_eq!(state.error(), Some("boom"));
        assert_eq!(state.map(|n| n + 1), UiState::Error("boom".to_string()));

        assert!(UiState::<()>::default().is_loading());
    }

    #[test]
    fn test_from_result() {
        let ok: Result<u8, String> = Ok(1);
        assert_eq!(UiState::from(ok), UiState::Success(1));
        let err: Result<u8, String> = Err("nope".to_string());
        assert_eq!(UiState::from(err), UiState::Error("nope".to_string()));
    }
}
