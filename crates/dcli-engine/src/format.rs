//! Display formatting for sizes, ages, identifiers and derived metrics

const KB: i64 = 1024;
const MB: i64 = 1024 * KB;
const GB: i64 = 1024 * MB;

/// Format a byte count with 1024-based units ("1.50 MB", "512 bytes")
pub fn format_size(size: i64) -> String {
    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Format a byte count for the stats table ("12.40MB"), scaling up to TB
pub fn format_size_stats(size: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = size;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.2}{}", size, UNITS[unit])
}

/// Relative age of `created` as seen from `now` (both epoch seconds).
///
/// Buckets are 30-day months, 7-day weeks and days; anything younger
/// than a day is "today".
pub fn format_timestamp(created: i64, now: i64) -> String {
    let hours = (now - created) as f64 / 3600.0;

    let months = (hours / (24.0 * 30.0)) as i64;
    let weeks = (hours / (24.0 * 7.0)) as i64;
    let days = (hours / 24.0) as i64;

    if months > 0 {
        format!("{} month{} ago", months, plural(months))
    } else if weeks > 0 {
        format!("{} week{} ago", weeks, plural(weeks))
    } else if days > 0 {
        format!("{} day{} ago", days, plural(days))
    } else {
        "today".to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Truncate to at most `max` characters
pub fn trim_value(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Docker Hub page for an image reference, ignoring its tag
pub fn docker_hub_url(image: &str) -> String {
    let last_slash = image.rfind('/').map(|i| i + 1).unwrap_or(0);
    let name = match image[last_slash..].find(':') {
        Some(colon) => &image[..last_slash + colon],
        None => image,
    };

    if name.contains('/') {
        format!("https://hub.docker.com/r/{}", name)
    } else {
        format!("https://hub.docker.com/_/{}", name)
    }
}

/// CPU usage in percent between two cumulative samples
pub fn cpu_percent(total: u64, pre_total: u64, system: u64, pre_system: u64) -> f64 {
    let cpu_delta = total as f64 - pre_total as f64;
    let system_delta = system as f64 - pre_system as f64;

    if system_delta > 0.0 {
        (cpu_delta / system_delta) * 100.0
    } else {
        0.0
    }
}

/// Memory usage in percent of the limit
pub fn memory_percent(usage: f64, limit: f64) -> f64 {
    if limit <= 0.0 {
        return 0.0;
    }
    (usage / limit) * 100.0
}
