use pest::error::{ErrorVariant, LineColLocation};
use pest::Span;
use pest_consume::{match_nodes, Error, Parser};

use super::ast::{DocumentData, ElementData, MarkupNode, RawAttribute, RawName};
use super::util::decode_entities;

type Result<T> = std::result::Result<T, Error<Rule>>;
type Node<'i> = pest_consume::Node<'i, Rule, ()>;

#[derive(Parser)]
#[grammar = "parser/xml_grammar.pest"] // relative to src
pub struct XmlParser;

fn custom_error(span: Span, message: String) -> Error<Rule> {
    Error::new_from_span(ErrorVariant::CustomError { message }, span)
}

fn decode(span: Span, raw: &str) -> Result<String> {
    decode_entities(raw).map_err(|m| custom_error(span, m))
}

fn content_node(node: Node) -> Result<MarkupNode> {
    Ok(match node.as_rule() {
        Rule::element => MarkupNode::Element(XmlParser::element(node)?),
        Rule::text => MarkupNode::Text(XmlParser::text(node)?),
        Rule::cdata => MarkupNode::CData(XmlParser::cdata(node)?),
        Rule::comment => MarkupNode::Comment(XmlParser::comment(node)?),
        Rule::pi => XmlParser::pi(node)?,
        r => {
            let span = node.as_span();
            return Err(custom_error(span, format!("unexpected {:?}", r)));
        }
    })
}

#[pest_consume::parser]
impl XmlParser {
    fn document(input: Node) -> Result<DocumentData> {
        let mut nodes = vec![];
        for child in input.into_children() {
            match child.as_rule() {
                Rule::element => nodes.push(MarkupNode::Element(Self::element(child)?)),
                Rule::comment => nodes.push(MarkupNode::Comment(Self::comment(child)?)),
                Rule::pi => nodes.push(Self::pi(child)?),
                _ => { /* xml declaration and EOI */ }
            }
        }
        Ok(DocumentData { nodes })
    }

    fn fragment(input: Node) -> Result<Vec<MarkupNode>> {
        input
            .into_children()
            .filter(|c| c.as_rule() != Rule::EOI)
            .map(content_node)
            .collect()
    }

    fn element(input: Node) -> Result<ElementData> {
        let span = input.as_span();
        let mut children = input.into_children();
        let name = match children.next() {
            Some(n) => Self::qname(n)?,
            None => return Err(custom_error(span, "element without a name".to_string())),
        };
        let mut attributes: Vec<RawAttribute> = vec![];
        let mut content = vec![];
        let mut end_name = None;
        for child in children {
            match child.as_rule() {
                Rule::attribute => {
                    let attribute = Self::attribute(child)?;
                    if attributes.iter().any(|a| a.name == attribute.name) {
                        return Err(custom_error(
                            span,
                            format!("attribute {} is specified twice", attribute.name),
                        ));
                    }
                    attributes.push(attribute);
                }
                Rule::qname => end_name = Some(Self::qname(child)?),
                Rule::empty_tag_end => {}
                _ => content.push(content_node(child)?),
            }
        }
        if let Some(end_name) = end_name {
            if end_name != name {
                return Err(custom_error(
                    span,
                    format!(
                        "element type {} must be terminated by the matching end-tag </{}>",
                        name, name
                    ),
                ));
            }
        }
        Ok(ElementData {
            name,
            attributes,
            children: content,
        })
    }

    fn attribute(input: Node) -> Result<RawAttribute> {
        Ok(match_nodes!(input.into_children();
            [qname(name), attr_value(value)] => RawAttribute { name, value },
        ))
    }

    fn attr_value(input: Node) -> Result<String> {
        let span = input.as_span();
        let raw = input
            .into_children()
            .next()
            .map(|n| n.as_str().to_string())
            .unwrap_or_default();
        decode(span, &raw)
    }

    fn qname(input: Node) -> Result<RawName> {
        let mut prefix = None;
        let mut local = String::new();
        for child in input.into_children() {
            match child.as_rule() {
                Rule::prefix => prefix = Some(child.as_str().to_string()),
                Rule::local_name => local = child.as_str().to_string(),
                _ => {}
            }
        }
        Ok(RawName { prefix, local })
    }

    fn text(input: Node) -> Result<String> {
        decode(input.as_span(), input.as_str())
    }

    fn cdata(input: Node) -> Result<String> {
        Ok(input
            .into_children()
            .next()
            .map(|n| n.as_str().to_string())
            .unwrap_or_default())
    }

    fn comment(input: Node) -> Result<String> {
        Ok(input
            .into_children()
            .next()
            .map(|n| n.as_str().to_string())
            .unwrap_or_default())
    }

    fn pi(input: Node) -> Result<MarkupNode> {
        let mut target = String::new();
        let mut data = String::new();
        for child in input.into_children() {
            match child.as_rule() {
                Rule::pi_target => target = child.as_str().to_string(),
                Rule::pi_data => data = child.as_str().to_string(),
                _ => {}
            }
        }
        Ok(MarkupNode::ProcessingInstruction { target, data })
    }
}

impl XmlParser {
    /// Parse a whole document: optional declaration, exactly one root element.
    pub fn parse_document(text: &str) -> Result<DocumentData> {
        let inputs = XmlParser::parse(Rule::document, text)?;
        let input = inputs.single()?;
        XmlParser::document(input)
    }

    /// Parse a sequence of sibling nodes, as accepted by XMLList.
    pub fn parse_fragment(text: &str) -> Result<Vec<MarkupNode>> {
        let inputs = XmlParser::parse(Rule::fragment, text)?;
        let input = inputs.single()?;
        XmlParser::fragment(input)
    }
}

/// One-line description of a parse failure with its position.
pub fn describe_error(e: &Error<Rule>) -> String {
    let (line, col) = match e.line_col {
        LineColLocation::Pos(p) => p,
        LineColLocation::Span(p, _) => p,
    };
    format!("{} at line {}, column {}", e.variant.message(), line, col)
}
