//! Named viewport-width breakpoints (mobile-first).

use std::collections::BTreeMap;

/// Built-in breakpoint table, in pixels.
pub const DEFAULT_BREAKPOINTS: [(&str, f64); 7] = [
    ("xs", 480.0),
    ("sm", 640.0),
    ("md", 768.0),
    ("lg", 1024.0),
    ("xl", 1280.0),
    ("2xl", 1536.0),
    ("3xl", 1920.0),
];

/// Breakpoint table sorted ascending by threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakpoints {
    entries: Vec<(String, f64)>,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::merged(&BTreeMap::new())
    }
}

impl Breakpoints {
    /// Defaults overlaid with `custom` (custom thresholds replace defaults
    /// of the same name), sorted ascending.
    pub fn merged(custom: &BTreeMap<String, f64>) -> Self {
        let mut map: BTreeMap<String, f64> = DEFAULT_BREAKPOINTS
            .iter()
            .map(|(name, px)| (name.to_string(), *px))
            .collect();
        for (name, px) in custom {
            map.insert(name.clone(), *px);
        }

        let mut entries: Vec<(String, f64)> = map.into_iter().collect();
        entries.sort_by(|a, b| a.1.total_cmp(&b.1));
        Self { entries }
    }

    pub fn threshold(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, px)| *px)
    }

    /// Name of the largest breakpoint whose threshold is at most `width`,
    /// or `"default"` below the smallest one.
    pub fn current(&self, width: f64) -> &str {
        let mut current = crate::side::DEFAULT_KEY;
        for (name, px) in &self.entries {
            if width >= *px {
                current = name.as_str();
            } else {
                break;
            }
        }
        current
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, px)| (name.as_str(), *px))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_breakpoint_by_width() {
        let bps = Breakpoints::default();
        assert_eq!(bps.current(320.0), "default");
        assert_eq!(bps.current(480.0), "xs");
        assert_eq!(bps.current(1023.0), "md");
        assert_eq!(bps.current(4000.0), "3xl");
    }

    #[test]
    fn custom_breakpoints_merge_and_sort() {
        let mut custom = BTreeMap::new();
        custom.insert("tablet".to_string(), 900.0);
        custom.insert("md".to_string(), 700.0);
        let bps = Breakpoints::merged(&custom);

        assert_eq!(bps.threshold("md"), Some(700.0));
        assert_eq!(bps.threshold("tablet"), Some(900.0));
        assert_eq!(bps.current(950.0), "tablet");

        let names: Vec<&str> = bps.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["xs", "sm", "md", "tablet", "lg", "xl", "2xl", "3xl"]);
    }
}
