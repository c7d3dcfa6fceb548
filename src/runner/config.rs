//! Runtime configuration.

/// Settings of the XML class. They govern how source text is turned into
/// a tree and how trees are written back out.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlSettings {
    /// Drop comments while parsing.
    pub ignore_comments: bool,
    /// Drop processing instructions while parsing.
    pub ignore_processing_instructions: bool,
    /// Trim text nodes and drop the ones that are whitespace only.
    pub ignore_whitespace: bool,
    /// Indent nested elements in `toXMLString`.
    pub pretty_printing: bool,
    /// Spaces per nesting level when pretty printing.
    pub pretty_indent: usize,
}

impl Default for XmlSettings {
    fn default() -> Self {
        XmlSettings {
            ignore_comments: true,
            ignore_processing_instructions: true,
            ignore_whitespace: true,
            pretty_printing: true,
            pretty_indent: 2,
        }
    }
}

impl XmlSettings {
    pub fn with_ignore_comments(mut self, ignore: bool) -> Self {
        self.ignore_comments = ignore;
        self
    }

    pub fn with_ignore_processing_instructions(mut self, ignore: bool) -> Self {
        self.ignore_processing_instructions = ignore;
        self
    }

    pub fn with_ignore_whitespace(mut self, ignore: bool) -> Self {
        self.ignore_whitespace = ignore;
        self
    }

    pub fn with_pretty_printing(mut self, pretty: bool) -> Self {
        self.pretty_printing = pretty;
        self
    }

    pub fn with_pretty_indent(mut self, indent: usize) -> Self {
        self.pretty_indent = indent;
        self
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeConfig {
    /// XML parsing and serialization settings.
    pub xml: XmlSettings,
}

impl RuntimeConfig {
    /// Create a configuration with every setting at its default.
    pub fn new() -> Self {
        RuntimeConfig::default()
    }

    pub fn with_xml_settings(mut self, xml: XmlSettings) -> Self {
        self.xml = xml;
        self
    }

    pub fn xml(&self) -> &XmlSettings {
        &self.xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_xml_class_settings() {
        let cfg = RuntimeConfig::new();
        assert!(cfg.xml().ignore_comments);
        assert!(cfg.xml().ignore_processing_instructions);
        assert!(cfg.xml().ignore_whitespace);
        assert!(cfg.xml().pretty_printing);
        assert_eq!(cfg.xml().pretty_indent, 2);
    }

    #[test]
    fn test_builder_overrides() {
        let cfg = RuntimeConfig::new().with_xml_settings(
            XmlSettings::default()
                .with_ignore_comments(false)
                .with_pretty_indent(4),
        );
        assert!(!cfg.xml.ignore_comments);
        assert_eq!(cfg.xml.pretty_indent, 4);
        assert!(cfg.xml.ignore_whitespace);
    }
}
