// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Built-in Cordova repository table.

use super::RepoDescriptor;

const ANDROID_EXCLUDES: [&str; 4] = ["*.properties", "bin", "gen", "proguard-project.txt"];

/// Platform repositories, in release order.
#[must_use]
pub fn platform_repos() -> Vec<RepoDescriptor> {
    vec![
        RepoDescriptor::new("android", "Android", "cordova-android")
            .platform()
            .with_js_paths(["framework/assets/www/cordova.js"])
            .with_excludes(ANDROID_EXCLUDES),
        RepoDescriptor::new("ios", "iOS", "cordova-ios")
            .platform()
            .with_js_paths(["CordovaLib/cordova.js"])
            .with_version_files(["CordovaLib/VERSION"]),
        RepoDescriptor::new("blackberry", "BlackBerry", "cordova-blackberry")
            .platform()
            .with_js_src_name("cordova.blackberry10.js")
            .with_js_paths(["blackberry10/javascript/cordova.blackberry10.js"])
            .with_version_files(["blackberry10/VERSION"]),
        RepoDescriptor::new("windows", "Windows", "cordova-windows")
            .platform()
            .with_js_src_name("cordova.windows8.js")
            .with_js_paths(["windows8/cordova.js", "windows8/template/www/cordova.js"])
            .with_version_files(["windows8/VERSION", "windows8/template/VERSION"]),
        RepoDescriptor::new("wp8", "Windows Phone 7 & 8", "cordova-wp8")
            .platform()
            .with_js_src_name("cordova.windowsphone.js")
            .with_js_paths(["common/www/cordova.js"]),
        RepoDescriptor::new("firefoxos", "Firefox OS", "cordova-firefoxos")
            .platform()
            .with_js_src_name("cordova.firefoxos.js")
            .with_js_paths(["cordova-lib/cordova.js"]),
        RepoDescriptor::new("osx", "Mac OSX", "cordova-osx")
            .platform()
            .inactive()
            .with_js_paths(["CordovaFramework/cordova.js"]),
        RepoDescriptor::new("ubuntu", "Ubuntu", "cordova-ubuntu")
            .platform()
            .with_js_paths(["www/cordova.js"]),
        RepoDescriptor::new("amazon-fireos", "Amazon Fire OS", "cordova-amazon-fireos")
            .platform()
            .with_js_paths(["framework/assets/www/cordova.js"])
            .with_excludes(ANDROID_EXCLUDES),
        RepoDescriptor::new("bada", "Bada", "cordova-bada")
            .platform()
            .inactive(),
        RepoDescriptor::new("bada-wac", "Bada WAC", "cordova-bada-wac")
            .platform()
            .inactive(),
        RepoDescriptor::new("webos", "WebOS", "cordova-webos")
            .platform()
            .inactive(),
        RepoDescriptor::new("qt", "QT", "cordova-qt").platform().inactive(),
        RepoDescriptor::new("tizen", "Tizen", "cordova-tizen")
            .platform()
            .inactive(),
    ]
}

fn non_platform_repos() -> Vec<RepoDescriptor> {
    vec![
        RepoDescriptor::new("docs", "Docs", "cordova-docs"),
        RepoDescriptor::new("mobile-spec", "MobileSpec", "cordova-mobile-spec")
            .with_excludes(["jasmine.*", "html", "uubench.js"]),
        RepoDescriptor::new("js", "Cordova JS", "cordova-js"),
        RepoDescriptor::new("app-hello-world", "Hello World App", "cordova-app-hello-world"),
    ]
}

const PLUGINS: &[(&str, &str)] = &[
    ("battery-status", "Battery Status"),
    ("camera", "Camera"),
    ("console", "Console"),
    ("contacts", "Contacts"),
    ("device-motion", "Device Motion"),
    ("device-orientation", "Device Orientation"),
    ("device", "Device"),
    ("dialogs", "Dialogs"),
    ("file-transfer", "File Transfer"),
    ("file", "File"),
    ("geolocation", "Geolocation"),
    ("globalization", "Globalization"),
    ("inappbrowser", "InAppBrowser"),
    ("media", "Media"),
    ("media-capture", "Media Capture"),
    ("network-information", "Network Information"),
    ("splashscreen", "Splash Screen"),
    ("vibration", "Vibration"),
    ("statusbar", "Statusbar"),
];

fn plugin_repos() -> Vec<RepoDescriptor> {
    PLUGINS
        .iter()
        .map(|(name, title)| {
            RepoDescriptor::new(
                format!("plugin-{name}"),
                format!("Plugin - {title}"),
                format!("cordova-plugin-{name}"),
            )
            .inactive()
        })
        .collect()
}

fn other_repos() -> Vec<RepoDescriptor> {
    vec![
        RepoDescriptor::new("cli", "Cordova CLI", "cordova-cli").inactive(),
        RepoDescriptor::new("plugman", "Cordova Plugman", "cordova-plugman").inactive(),
        RepoDescriptor::new("medic", "Cordova Medic", "cordova-medic").inactive(),
        RepoDescriptor::new("app-harness", "Cordova App Harness", "cordova-app-harness").inactive(),
        RepoDescriptor::new("coho", "Cordova Coho", "cordova-coho").inactive(),
        RepoDescriptor::new("labs", "Cordova Labs", "cordova-labs").inactive(),
        RepoDescriptor::new("registry-web", "Cordova Registry Website", "cordova-registry-web")
            .inactive(),
        RepoDescriptor::new("registry", "Cordova Registry DB", "cordova-registry").inactive(),
        RepoDescriptor::new("dist", "Apache dist/release/cordova", "cordova-dist")
            .inactive()
            .svn("https://dist.apache.org/repos/dist/release/cordova"),
        RepoDescriptor::new("dist/dev", "Apache dist/dev/cordova", "cordova-dist-dev")
            .inactive()
            .svn("https://dist.apache.org/repos/dist/dev/cordova"),
        RepoDescriptor::new("website", "Cordova Website", "cordova-website")
            .inactive()
            .svn("https://svn.apache.org/repos/asf/cordova/site"),
    ]
}

/// Every built-in repository: platforms, then tooling, plugins and the rest.
#[must_use]
pub fn builtin_repos() -> Vec<RepoDescriptor> {
    let mut repos = platform_repos();
    repos.extend(non_platform_repos());
    repos.extend(plugin_repos());
    repos.extend(other_repos());
    repos
}

/// Members of the `cadence` group beyond the active platforms.
pub const CADENCE_EXTRAS: &[&str] = &["cli", "js", "mobile-spec", "app-hello-world", "docs"];
