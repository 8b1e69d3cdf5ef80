pub mod check_duplicate;
pub mod forms;
pub mod verify_current_password;

pub use check_duplicate::CheckDuplicate;
pub use verify_current_password::VerifyCurrentPassword;

/// Verdict message while a gateway call is pending.
pub const CHECKING_MESSAGE: &str = "🔄 확인 중...";

/// Generic verdict message for a failed gateway call. The cause is logged,
/// never shown.
pub const CHECK_FAILED_MESSAGE: &str = "❌ 확인 중 오류가 발생했습니다";
