use regex::Regex;
use tracing::debug;

/// Model letters GoPro firmware puts in the second position of a file name
/// (Hero6 through Hero12).
const CAMERA_LETTERS: &str = "HLX";

/// Length of the `vvvvcc-` prefix that `rename` puts in front of a native name.
pub const RENAMED_PREFIX_LEN: usize = 7;

/// How a file name stem relates to the two GoPro naming schemes.
///
/// `video` is the 4-digit session number and `chapter` the 2-digit clip index,
/// both kept as text since their leading zeros are part of the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Native { video: String, chapter: String },
    Renamed { video: String, chapter: String },
    NoMatch,
}

pub struct NameGrammar {
    native_pattern: Regex,
    renamed_pattern: Regex,
}

impl NameGrammar {
    pub fn new() -> Result<Self, regex::Error> {
        // ASCII digits only, so byte offsets below are character offsets.
        let native = format!("G[{}][0-9]{{6}}", CAMERA_LETTERS);
        let native_pattern = Regex::new(&format!("^{}$", native))?;
        let renamed_pattern = Regex::new(&format!("^[0-9]{{6}}-{}$", native))?;
        Ok(Self {
            native_pattern,
            renamed_pattern,
        })
    }

    /// Classifies a stem (a file name with its extension already removed).
    pub fn classify(&self, stem: &str) -> Classification {
        if self.native_pattern.is_match(stem) {
            // GHccvvvv
            return Classification::Native {
                video: stem[4..8].to_string(),
                chapter: stem[2..4].to_string(),
            };
        }

        if self.renamed_pattern.is_match(stem) {
            // vvvvcc-GHccvvvv
            let video = &stem[0..4];
            let chapter = &stem[4..6];
            if video == &stem[11..15] && chapter == &stem[9..11] {
                return Classification::Renamed {
                    video: video.to_string(),
                    chapter: chapter.to_string(),
                };
            }
            debug!("Prefix does not match embedded numbers: '{}'", stem);
        }

        Classification::NoMatch
    }

    pub fn classify_file_name(&self, file_name: &str) -> Classification {
        self.classify(stem(file_name))
    }
}

/// Strips the final extension, e.g. `"GH010446.MP4"` yields `"GH010446"`.
pub fn stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(index) => &file_name[..index],
        None => file_name,
    }
}
