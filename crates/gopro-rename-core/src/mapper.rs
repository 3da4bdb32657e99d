use std::fmt;

use tracing::debug;

use crate::grammar::{Classification, NameGrammar, RENAMED_PREFIX_LEN};

/// Direction of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Native names get a `vvvvcc-` prefix.
    Rename,
    /// Renamed names lose their prefix again.
    Revert,
}

impl Mode {
    /// Verb used in log lines, e.g. `renaming a -> b`.
    pub fn verb(&self) -> &'static str {
        match self {
            Mode::Rename => "renaming",
            Mode::Revert => "reverting",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Rename => write!(f, "rename"),
            Mode::Revert => write!(f, "revert"),
        }
    }
}

/// Maps file names between the native and the renamed scheme.
///
/// Both directions classify the name first and return `None` when it does not
/// belong to the source scheme, so `to_native(to_renamed(f)) == Some(f)` for
/// every native `f`, and vice versa.
pub struct NameMapper {
    grammar: NameGrammar,
}

impl NameMapper {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            grammar: NameGrammar::new()?,
        })
    }

    pub fn grammar(&self) -> &NameGrammar {
        &self.grammar
    }

    /// `"GH010446.MP4"` becomes `"044601-GH010446.MP4"`.
    pub fn to_renamed(&self, file_name: &str) -> Option<String> {
        match self.grammar.classify_file_name(file_name) {
            Classification::Native { video, chapter } => {
                let new_name = format!("{}{}-{}", video, chapter, file_name);
                debug!("Mapped to renamed: '{}' -> '{}'", file_name, new_name);
                Some(new_name)
            }
            _ => None,
        }
    }

    /// `"044601-GH010446.MP4"` becomes `"GH010446.MP4"`.
    pub fn to_native(&self, file_name: &str) -> Option<String> {
        match self.grammar.classify_file_name(file_name) {
            Classification::Renamed { .. } => {
                let new_name = file_name[RENAMED_PREFIX_LEN..].to_string();
                debug!("Mapped to native: '{}' -> '{}'", file_name, new_name);
                Some(new_name)
            }
            _ => None,
        }
    }

    pub fn map(&self, mode: Mode, file_name: &str) -> Option<String> {
        match mode {
            Mode::Rename => self.to_renamed(file_name),
            Mode::Revert => self.to_native(file_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> NameMapper {
        NameMapper::new().unwrap()
    }

    #[test]
    fn test_to_renamed() {
        let mapper = mapper();

        assert_eq!(mapper.to_renamed("GH010446.MP4").as_deref(), Some("044601-GH010446.MP4"));
        assert_eq!(mapper.to_renamed("GX010446.MP4").as_deref(), Some("044601-GX010446.MP4"));
        assert_eq!(mapper.to_renamed("GL010446.MP4").as_deref(), Some("044601-GL010446.MP4"));
    }

    #[test]
    fn test_to_renamed_keeps_extension_verbatim() {
        let mapper = mapper();

        assert_eq!(mapper.to_renamed("GH030527.lrv").as_deref(), Some("052703-GH030527.lrv"));
        assert_eq!(mapper.to_renamed("GH030527").as_deref(), Some("052703-GH030527"));
        assert_eq!(mapper.to_renamed("GH030527.").as_deref(), Some("052703-GH030527."));
    }

    #[test]
    fn test_to_native() {
        let mapper = mapper();

        assert_eq!(mapper.to_native("044601-GH010446.MP4").as_deref(), Some("GH010446.MP4"));
        assert_eq!(mapper.to_native("044601-GX010446.MP4").as_deref(), Some("GX010446.MP4"));
        assert_eq!(mapper.to_native("044601-GL010446.MP4").as_deref(), Some("GL010446.MP4"));
    }

    #[test]
    fn test_outside_domain() {
        let mapper = mapper();

        assert_eq!(mapper.to_renamed("044601-GH010446.MP4"), None);
        assert_eq!(mapper.to_renamed("readme.txt"), None);
        assert_eq!(mapper.to_native("GH010446.MP4"), None);
        assert_eq!(mapper.to_native("999999-GH010527.MP4"), None);
    }

    #[test]
    fn test_round_trip() {
        let mapper = mapper();

        for name in ["GH010527.MP4", "GL990001.THM", "GX000000", "GH123456.mp4"] {
            let renamed = mapper.to_renamed(name).unwrap();
            assert_eq!(mapper.to_native(&renamed).as_deref(), Some(name));
            assert_eq!(mapper.to_renamed(&mapper.to_native(&renamed).unwrap()), Some(renamed));
        }
    }

    #[test]
    fn test_map_by_mode() {
        let mapper = mapper();

        assert_eq!(mapper.map(Mode::Rename, "GH010527.MP4").as_deref(), Some("052701-GH010527.MP4"));
        assert_eq!(mapper.map(Mode::Revert, "GH010527.MP4"), None);
        assert_eq!(mapper.map(Mode::Revert, "052701-GH010527.MP4").as_deref(), Some("GH010527.MP4"));
        assert_eq!(mapper.map(Mode::Rename, "052701-GH010527.MP4"), None);
    }
}
