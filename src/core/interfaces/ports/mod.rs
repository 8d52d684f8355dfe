mod acquisition_source;
mod permission_authority;
mod user_notifier;

pub use acquisition_source::AcquisitionSource;
pub use permission_authority::PermissionAuthority;
pub use user_notifier::UserNotifier;
