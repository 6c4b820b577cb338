mod prefer;
mod test_user;

pub use prefer::Prefer;
pub use test_user::TestUser;
