mod command_camera_source;
mod console_notifier;
mod console_permission_authority;
mod file_library_source;
mod google_vision_recognition_client;
mod tesseract_recognition_client;

pub use command_camera_source::CommandCameraSource;
pub use console_notifier::ConsoleNotifier;
pub use console_permission_authority::ConsolePermissionAuthority;
pub use file_library_source::FileLibrarySource;
pub use google_vision_recognition_client::{GoogleVisionRecognitionClient, VisionCredentials};
pub use tesseract_recognition_client::TesseractRecognitionClient;
