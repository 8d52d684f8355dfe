mod image_acquirer;
mod payload_encoder;
mod reading_extractor;

#[cfg(test)]
pub(crate) mod test_doubles;

pub use image_acquirer::ImageAcquirer;
pub use payload_encoder::PayloadEncoder;
pub use reading_extractor::ReadingExtractor;
