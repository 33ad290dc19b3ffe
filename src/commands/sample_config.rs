use crate::input::GoogleAnalyticsInput;

/// Handle the `ga-report sample-config` command
pub fn handle_sample_config() {
    println!("# {}", GoogleAnalyticsInput::description());
    print!("{}", GoogleAnalyticsInput::sample_config());
}
