mod login_attempts;
mod sessions;
mod tokens;
mod two_factor;
mod users;

pub use login_attempts::{LoginAttemptCrud, NewLoginAttempt};
pub use sessions::SessionCrud;
pub use tokens::{TokenCrud, TokenKind};
pub use two_factor::TwoFactorCrud;
pub use users::UserCrud;
