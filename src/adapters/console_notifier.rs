use std::io::Write;
use std::sync::Mutex;

use crate::core::interfaces::ports::UserNotifier;

type NoticeWriter = Box<dyn Write + Send>;

/// Blocking notices are boxed onto the terminal. Status lines only go to the
/// log: the reading view is what renders failures for the user.
pub struct ConsoleNotifier {
    notice_writer: Mutex<NoticeWriter>,
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    pub fn with_writer(notice_writer: NoticeWriter) -> Self {
        Self {
            notice_writer: Mutex::new(notice_writer),
        }
    }

    fn format_notice(title: &str, message: &str) -> String {
        let width = title.chars().count().max(message.chars().count()) + 2;
        let border = "─".repeat(width);

        format!(
            "┌{border}┐\n│ {title:<inner$} │\n│ {message:<inner$} │\n└{border}┘",
            border = border,
            title = title,
            message = message,
            inner = width - 2
        )
    }
}

impl UserNotifier for ConsoleNotifier {
    fn show_blocking_notice(&self, title: &str, message: &str) {
        log::warn!("[NOTIFIER] {}: {}", title, message);

        let Ok(mut writer) = self.notice_writer.lock() else {
            log::error!("[NOTIFIER] Notice writer lock poisoned");
            return;
        };
        if let Err(error) = writeln!(writer, "{}", Self::format_notice(title, message)) {
            log::error!("[NOTIFIER] Failed to write notice: {}", error);
        }
    }

    fn show_status(&self, message: &str) {
        log::info!("[NOTIFIER] {}", message);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_format_notice_boxes_title_and_message() {
        let notice = ConsoleNotifier::format_notice("Insufficient permissions", "Grant camera");
        let lines: Vec<&str> = notice.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("Insufficient permissions"));
        assert!(lines[2].contains("Grant camera"));
        assert_eq!(lines[1].chars().count(), lines[2].chars().count());
        assert_eq!(lines[0].chars().count(), lines[3].chars().count());
    }

    #[test]
    fn test_blocking_notice_is_written_to_the_terminal() {
        let buffer = SharedBuffer::default();
        let notifier = ConsoleNotifier::with_writer(Box::new(buffer.clone()));

        notifier.show_blocking_notice("Insufficient permissions", "Grant camera");

        assert!(buffer.contents().contains("Insufficient permissions"));
    }

    #[test]
    fn test_status_line_stays_off_the_terminal() {
        let buffer = SharedBuffer::default();
        let notifier = ConsoleNotifier::with_writer(Box::new(buffer.clone()));

        notifier.show_status("Reading failed: network request failed: timed out");

        assert!(buffer.contents().is_empty());
    }
}
