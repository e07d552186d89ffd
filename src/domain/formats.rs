use std::fmt;

use crate::api::AudioFormat;

/// A selectable entry of the format picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOption {
    pub format_id: String,
    pub label: String,
}

impl fmt::Display for FormatOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormatList {
    #[default]
    Empty,
    Options(Vec<FormatOption>),
    /// No audio-only format exists; a single disabled entry is shown
    Placeholder,
}

impl FormatList {
    pub fn from_formats(formats: &[AudioFormat]) -> Self {
        let options: Vec<FormatOption> = formats
            .iter()
            .filter(|f| is_audio_only(f))
            .map(|f| FormatOption {
                format_id: f.format_id.clone().unwrap_or_default(),
                label: format_label(f),
            })
            .collect();

        if options.is_empty() {
            FormatList::Placeholder
        } else {
            FormatList::Options(options)
        }
    }

    pub fn options(&self) -> &[FormatOption] {
        match self {
            FormatList::Options(options) => options,
            FormatList::Empty | FormatList::Placeholder => &[],
        }
    }

    pub fn first(&self) -> Option<&FormatOption> {
        self.options().first()
    }
}

/// No video stream and a real audio codec
pub fn is_audio_only(format: &AudioFormat) -> bool {
    format.vcodec.as_deref() == Some("none")
        && matches!(format.acodec.as_deref(), Some(codec) if !codec.is_empty() && codec != "none")
}

/// `ext - acodec - abr kbps - language`, skipping absent fields
pub fn format_label(format: &AudioFormat) -> String {
    let mut parts = Vec::new();
    if let Some(ext) = format.ext.as_deref().filter(|s| !s.is_empty()) {
        parts.push(ext.to_string());
    }
    if let Some(acodec) = format
        .acodec
        .as_deref()
        .filter(|s| !s.is_empty() && *s != "none")
    {
        parts.push(acodec.to_string());
    }
    if let Some(abr) = &format.abr {
        parts.push(format!("{}kbps", abr));
    }
    if let Some(language) = format.language.as_deref().filter(|s| !s.is_empty()) {
        parts.push(language.to_string());
    }
    parts.join(" - ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Bitrate;

    fn format(id: &str, acodec: Option<&str>, vcodec: Option<&str>) -> AudioFormat {
        AudioFormat {
            format_id: Some(id.to_string()),
            ext: Some("webm".into()),
            acodec: acodec.map(String::from),
            vcodec: vcodec.map(String::from),
            abr: None,
            language: None,
        }
    }

    #[test]
    fn test_single_audio_format_label() {
        let formats = vec![AudioFormat {
            format_id: Some("1".into()),
            ext: Some("m4a".into()),
            acodec: Some("aac".into()),
            vcodec: Some("none".into()),
            abr: Some(Bitrate::Number(128.0)),
            language: None,
        }];

        let list = FormatList::from_formats(&formats);
        assert_eq!(
            list,
            FormatList::Options(vec![FormatOption {
                format_id: "1".into(),
                label: "m4a - aac - 128kbps".into(),
            }])
        );
    }

    #[test]
    fn test_only_audio_only_formats_kept() {
        let formats = vec![
            format("video+audio", Some("opus"), Some("vp9")),
            format("audio", Some("opus"), Some("none")),
            format("silent", Some("none"), Some("none")),
            format("unknown-video", Some("opus"), None),
            format("no-acodec", None, Some("none")),
            format("audio2", Some("mp4a.40.2"), Some("none")),
        ];

        let ids: Vec<_> = FormatList::from_formats(&formats)
            .options()
            .iter()
            .map(|o| o.format_id.clone())
            .collect();
        assert_eq!(ids, vec!["audio", "audio2"]);
    }

    #[test]
    fn test_no_audio_formats_gives_placeholder() {
        let formats = vec![format("18", Some("mp4a"), Some("avc1"))];
        let list = FormatList::from_formats(&formats);
        assert_eq!(list, FormatList::Placeholder);
        assert!(list.options().is_empty());
        assert_eq!(FormatList::from_formats(&[]), FormatList::Placeholder);
    }

    #[test]
    fn test_label_with_language_and_text_bitrate() {
        let f = AudioFormat {
            format_id: Some("251".into()),
            ext: Some("webm".into()),
            acodec: Some("opus".into()),
            vcodec: Some("none".into()),
            abr: Some(Bitrate::Text("160".into())),
            language: Some("en".into()),
        };
        assert_eq!(format_label(&f), "webm - opus - 160kbps - en");

        let bare = AudioFormat {
            acodec: Some("opus".into()),
            vcodec: Some("none".into()),
            ..Default::default()
        };
        assert_eq!(format_label(&bare), "opus");
    }
}
