pub trait UserNotifier: Send + Sync {
    fn show_blocking_notice(&self, title: &str, message: &str);

    fn show_status(&self, message: &str);
}
