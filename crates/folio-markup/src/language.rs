//! Diagram languages recognized in fenced blocks.
//!
//! A fence opens a diagram only when its info string names one of these
//! languages. Any other fence (```` ```rust ````, a bare ```` ``` ````) stays in
//! the surrounding text segment.

/// Supported diagram languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DiagramLanguage {
    Mermaid,
    PlantUml,
    C4PlantUml,
    GraphViz,
    Ditaa,
    BlockDiag,
    SeqDiag,
    ActDiag,
    NwDiag,
    PacketDiag,
    RackDiag,
    Erd,
    Nomnoml,
    Svgbob,
    Vega,
    VegaLite,
    WaveDrom,
}

impl DiagramLanguage {
    /// Every fence tag that opens a diagram block, without the optional
    /// `kroki-` prefix.
    pub const FENCE_TAGS: &'static [&'static str] = &[
        "mermaid",
        "plantuml",
        "c4plantuml",
        "graphviz",
        "dot",
        "ditaa",
        "blockdiag",
        "seqdiag",
        "actdiag",
        "nwdiag",
        "packetdiag",
        "rackdiag",
        "erd",
        "nomnoml",
        "svgbob",
        "vega",
        "vegalite",
        "wavedrom",
    ];

    /// Parse language from a code fence info string.
    ///
    /// Accepts both `mermaid` and `kroki-mermaid`. Returns `None` if the tag
    /// does not name a diagram language.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let lang = s.strip_prefix("kroki-").unwrap_or(s);

        match lang {
            "mermaid" => Some(Self::Mermaid),
            "plantuml" => Some(Self::PlantUml),
            "c4plantuml" => Some(Self::C4PlantUml),
            "graphviz" | "dot" => Some(Self::GraphViz),
            "ditaa" => Some(Self::Ditaa),
            "blockdiag" => Some(Self::BlockDiag),
            "seqdiag" => Some(Self::SeqDiag),
            "actdiag" => Some(Self::ActDiag),
            "nwdiag" => Some(Self::NwDiag),
            "packetdiag" => Some(Self::PacketDiag),
            "rackdiag" => Some(Self::RackDiag),
            "erd" => Some(Self::Erd),
            "nomnoml" => Some(Self::Nomnoml),
            "svgbob" => Some(Self::Svgbob),
            "vega" => Some(Self::Vega),
            "vegalite" => Some(Self::VegaLite),
            "wavedrom" => Some(Self::WaveDrom),
            _ => None,
        }
    }

    /// Kroki endpoint name for this diagram type.
    #[must_use]
    pub fn kroki_endpoint(self) -> &'static str {
        match self {
            Self::Mermaid => "mermaid",
            Self::PlantUml => "plantuml",
            Self::C4PlantUml => "c4plantuml",
            Self::GraphViz => "graphviz",
            Self::Ditaa => "ditaa",
            Self::BlockDiag => "blockdiag",
            Self::SeqDiag => "seqdiag",
            Self::ActDiag => "actdiag",
            Self::NwDiag => "nwdiag",
            Self::PacketDiag => "packetdiag",
            Self::RackDiag => "rackdiag",
            Self::Erd => "erd",
            Self::Nomnoml => "nomnoml",
            Self::Svgbob => "svgbob",
            Self::Vega => "vega",
            Self::VegaLite => "vegalite",
            Self::WaveDrom => "wavedrom",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direct_name() {
        assert_eq!(
            DiagramLanguage::parse("mermaid"),
            Some(DiagramLanguage::Mermaid)
        );
        assert_eq!(
            DiagramLanguage::parse("plantuml"),
            Some(DiagramLanguage::PlantUml)
        );
    }

    #[test]
    fn test_parse_kroki_prefix() {
        assert_eq!(
            DiagramLanguage::parse("kroki-mermaid"),
            Some(DiagramLanguage::Mermaid)
        );
    }

    #[test]
    fn test_parse_dot_alias() {
        assert_eq!(DiagramLanguage::parse("dot"), Some(DiagramLanguage::GraphViz));
        assert_eq!(DiagramLanguage::GraphViz.kroki_endpoint(), "graphviz");
    }

    #[test]
    fn test_parse_non_diagram() {
        assert_eq!(DiagramLanguage::parse("rust"), None);
        assert_eq!(DiagramLanguage::parse(""), None);
        assert_eq!(DiagramLanguage::parse("kroki-"), None);
    }

    #[test]
    fn test_every_fence_tag_parses() {
        for tag in DiagramLanguage::FENCE_TAGS {
            assert!(
                DiagramLanguage::parse(tag).is_some(),
                "fence tag {tag} should parse"
            );
        }
    }
}
