pub const APPLICATION_NAME: &str = "vitals-ocr";
pub const APPLICATION_TITLE: &str = "Vitals OCR";

pub const LOG_TAG_APP: &str = "[APP]";
pub const LOG_TAG_PIPELINE: &str = "[PIPELINE]";
pub const LOG_TAG_ACQUIRER: &str = "[ACQUIRER]";
pub const LOG_TAG_PERMISSIONS: &str = "[PERMISSIONS]";

pub const CONFIG_DIRECTORY_NAME: &str = "vitals-ocr";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";
pub const FEATURE_TEXT_DETECTION: &str = "TEXT_DETECTION";
pub const HEADER_USER_PROJECT: &str = "x-goog-user-project";
pub const ENV_VISION_ACCESS_TOKEN: &str = "VISION_ACCESS_TOKEN";
pub const ENV_VISION_PROJECT_ID: &str = "VISION_PROJECT_ID";

pub const CAPTURE_OUTPUT_PLACEHOLDER: &str = "{output}";
pub const DEFAULT_CAPTURE_COMMAND: [&str; 5] =
    ["fswebcam", "--no-banner", "-r", "1280x720", CAPTURE_OUTPUT_PLACEHOLDER];
pub const CAPTURE_FILE_PREFIX: &str = "vitals-ocr-capture";

pub const LIBRARY_IMAGE_EXTENSIONS: [&str; 8] =
    ["png", "jpg", "jpeg", "webp", "bmp", "gif", "tif", "tiff"];

pub const TESSERACT_BINARY: &str = "tesseract";
pub const DEFAULT_TESSERACT_LANGUAGE: &str = "eng";

pub const FULL_TEXT_ANNOTATION_INDEX: usize = 0;
pub const SATURATION_ANNOTATION_INDEX: usize = 2;
pub const HEART_RATE_ANNOTATION_INDEX: usize = 4;
pub const POSITIONAL_ANNOTATION_MINIMUM: usize = 5;

pub const DEFAULT_SATURATION_LABEL: &str = "sp[o0]2";
pub const DEFAULT_HEART_RATE_LABEL: &str = "hr|pr|pulse";

pub const NOTICE_PERMISSION_TITLE: &str = "Insufficient permissions";
pub const NOTICE_PERMISSION_MESSAGE: &str = "You need to grant {} permissions";

pub const MESSAGE_MISSING_CREDENTIALS: &str =
    "remote recognizer selected but VISION_ACCESS_TOKEN / VISION_PROJECT_ID are not set";
pub const MESSAGE_MISSING_TESSERACT: &str =
    "on-device recognizer selected but the tesseract executable was not found on PATH";
