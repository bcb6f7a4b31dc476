use std::path::{Path, PathBuf};

use nibpad_loader::Charset;

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub file: FileConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    /// Explicit charset applied to every load; `None` auto-detects.
    pub encoding: Option<Charset>,
    pub skip_non_text: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub regex: bool,
}

impl AppConfig {
    pub fn load_or_default(path: &Path) -> Self {
        // Minimal INI-like parser (sections + key=value), intentionally
        // small and dependency-free.
        let Ok(text) = std::fs::read_to_string(path) else {
            return Self::default();
        };

        let mut cfg = Self::default();
        let mut section = String::new();

        for raw_line in text.lines() {
            let line = raw_line
                .split_once('#')
                .map(|(left, _)| left)
                .unwrap_or(raw_line)
                .trim();
            if line.is_empty() {
                continue;
            }

            if let Some(section_name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = section_name.trim().to_ascii_lowercase();
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            match section.as_str() {
                "file" => apply_file_kv(&mut cfg.file, &key, value),
                "search" => apply_search_kv(&mut cfg.search, &key, value),
                _ => {}
            }
        }

        cfg
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, self.to_string())?;
        // `rename` won't overwrite on Windows, so remove the old file first.
        if path.exists() {
            let _ = std::fs::remove_file(path);
        }
        std::fs::rename(tmp, path)?;
        Ok(())
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "# nibpad config")?;
        writeln!(f)?;

        writeln!(f, "[file]")?;
        match self.file.encoding {
            Some(encoding) => writeln!(f, "encoding={encoding}")?,
            None => writeln!(f, "encoding=auto")?,
        }
        writeln!(f, "skip_non_text={}", self.file.skip_non_text)?;
        writeln!(f)?;

        writeln!(f, "[search]")?;
        writeln!(f, "case_sensitive={}", self.search.case_sensitive)?;
        writeln!(f, "whole_word={}", self.search.whole_word)?;
        writeln!(f, "regex={}", self.search.regex)?;

        Ok(())
    }
}

fn apply_file_kv(file: &mut FileConfig, key: &str, value: &str) {
    if key == "encoding" {
        if value.eq_ignore_ascii_case("auto") {
            file.encoding = None;
        } else if let Ok(charset) = value.parse::<Charset>() {
            file.encoding = Some(charset);
        }
    }
    if key == "skip_non_text" {
        if let Some(v) = parse_bool(value) {
            file.skip_non_text = v;
        }
    }
}

fn apply_search_kv(search: &mut SearchConfig, key: &str, value: &str) {
    if key == "case_sensitive" {
        if let Some(v) = parse_bool(value) {
            search.case_sensitive = v;
        }
    }
    if key == "whole_word" {
        if let Some(v) = parse_bool(value) {
            search.whole_word = v;
        }
    }
    if key == "regex" {
        if let Some(v) = parse_bool(value) {
            search.regex = v;
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}


pub fn default_config_path() -> PathBuf {
    // `NIBPAD_CONFIG` overrides the default, which is under the per-user
    // config dir.
    if let Some(p) = std::env::var_os("NIBPAD_CONFIG") {
        return PathBuf::from(p);
    }

    let base = std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from))
        .or_else(|| {
            std::env::var_os("HOME").map(|home| {
                let mut p = PathBuf::from(home);
                p.push(".config");
                p
            })
        })
        .unwrap_or_else(|| PathBuf::from("."));

    base.join("nibpad").join("config.ini")
}
