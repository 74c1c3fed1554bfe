//! User-agent classification for page-view records.
//!
//! A deliberately small matcher: analytics only needs the coarse device
//! type plus best-effort OS and browser names, and bad input must degrade
//! to `unknown` instead of failing the record operation.

use crate::domain::page_view::{DeviceInfo, DeviceType};

/// Derive a device descriptor from a raw user-agent header value.
///
/// Empty or unrecognised input yields `DeviceType::Unknown` with no OS or
/// browser. Never fails.
pub fn parse_device_info(user_agent: &str) -> DeviceInfo {
    let ua = user_agent.trim();
    if ua.is_empty() {
        return DeviceInfo::default();
    }

    let os = detect_os(ua);
    DeviceInfo {
        device_type: detect_device_type(ua, os.is_some()),
        os: os.map(str::to_owned),
        browser: detect_browser(ua).map(str::to_owned),
    }
}

fn detect_device_type(ua: &str, has_os: bool) -> DeviceType {
    if ua.contains("iPad") || ua.contains("Tablet") {
        return DeviceType::Tablet;
    }
    if ua.contains("Android") && !ua.contains("Mobile") {
        // Android tablets advertise Android without the Mobile token.
        return DeviceType::Tablet;
    }
    if ua.contains("Mobile")
        || ua.contains("iPhone")
        || ua.contains("iPod")
        || ua.contains("Windows Phone")
    {
        return DeviceType::Mobile;
    }
    if has_os {
        // No device marker but a recognised OS: treat as desktop.
        return DeviceType::Desktop;
    }
    DeviceType::Unknown
}

fn detect_os(ua: &str) -> Option<&'static str> {
    if ua.contains("Windows Phone") {
        Some("Windows Phone")
    } else if ua.contains("Windows NT") || ua.contains("Windows") {
        Some("Windows")
    } else if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod") {
        Some("iOS")
    } else if ua.contains("Mac OS X") || ua.contains("Macintosh") {
        Some("macOS")
    } else if ua.contains("Android") {
        Some("Android")
    } else if ua.contains("CrOS") {
        Some("Chrome OS")
    } else if ua.contains("Linux") || ua.contains("X11") {
        Some("Linux")
    } else {
        None
    }
}

fn detect_browser(ua: &str) -> Option<&'static str> {
    // Order matters: Chrome-family agents also advertise Safari, and Edge
    // and Opera also advertise Chrome.
    if ua.contains("Edg/") || ua.contains("Edge/") {
        Some("Edge")
    } else if ua.contains("OPR/") || ua.contains("Opera") {
        Some("Opera")
    } else if ua.contains("Firefox/") {
        Some("Firefox")
    } else if ua.contains("Chrome/") || ua.contains("CriOS/") {
        Some("Chrome")
    } else if ua.contains("Safari/") {
        Some("Safari")
    } else {
        None
    }
}
