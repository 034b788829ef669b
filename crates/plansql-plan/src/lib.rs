//! Showplan XML reader.
//!
//! Walks a SQL Server showplan document and yields one
//! [`PlanStatement`] per `StmtSimple` element, in document order:
//! the statement's `StatementText` parsed into a token tree (when
//! present) and its [`ParameterMap`] collected from the nested
//! `QueryPlan/ParameterList/ColumnReference` elements.
//!
//! Reading is lazy and single-pass: [`PlanReader`] is an iterator
//! that advances the underlying XML reader one statement at a time.
//! The first malformed element or missing required attribute ends
//! the iteration with an error.

use plansql_ast::TokenTree;
use plansql_error::{PlanSqlError, Result};
use plansql_parser::parse_first;
use quick_xml::NsReader;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use tracing::debug;

/// The one plan dialect this tool understands.
pub const SHOWPLAN_NS: &str = "http://schemas.microsoft.com/sqlserver/2004/07/showplan";

/// A compiled parameter: declared type and compiled literal value,
/// both kept verbatim as captured strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub data_type: String,
    pub compiled_value: String,
}

/// Insertion-ordered parameter name -> [`Parameter`] mapping.
///
/// Keys are unique within one statement; inserting an existing name
/// replaces its value in place, keeping the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    entries: Vec<(String, Parameter)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, parameter: Parameter) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = parameter;
        } else {
            self.entries.push((name, parameter));
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Parameter)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (String, Parameter)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, parameter) in iter {
            map.insert(name, parameter);
        }
        map
    }
}

/// One unit of execution within the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStatement {
    /// Parsed `StatementText`, absent when the plan captured none.
    pub sql: Option<TokenTree>,
    pub params: ParameterMap,
}

struct StatementBuilder {
    sql: Option<TokenTree>,
    params: ParameterMap,
    /// Element-stack depth at which the `StmtSimple` opened; its
    /// matching end tag pops back to this depth.
    depth: usize,
}

/// Lazy iterator over a showplan document's statements.
pub struct PlanReader<'a> {
    reader: NsReader<&'a [u8]>,
    stack: Vec<String>,
    current: Option<StatementBuilder>,
    done: bool,
}

impl<'a> PlanReader<'a> {
    pub fn new(document: &'a str) -> Self {
        Self {
            reader: NsReader::from_str(document),
            stack: Vec::new(),
            current: None,
            done: false,
        }
    }

    /// Eagerly read the whole document.
    pub fn read_all(document: &str) -> Result<Vec<PlanStatement>> {
        PlanReader::new(document).collect()
    }

    fn stack_ends_with(&self, suffix: &[&str]) -> bool {
        self.stack.len() >= suffix.len()
            && self.stack[self.stack.len() - suffix.len()..]
                .iter()
                .zip(suffix)
                .all(|(have, want)| have == want)
    }

    fn attr_value(&self, element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
        for attr in element.attributes() {
            let attr: Attribute<'_> = attr.map_err(|e| PlanSqlError::Document(e.to_string()))?;
            if attr.key.local_name().as_ref() == name.as_bytes() {
                let value = attr
                    .decode_and_unescape_value(self.reader.decoder())
                    .map_err(|e| PlanSqlError::Document(e.to_string()))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn required_attr(&self, element: &BytesStart<'_>, name: &str) -> Result<String> {
        self.attr_value(element, name)?
            .ok_or_else(|| PlanSqlError::MissingAttribute {
                element: "ColumnReference".to_string(),
                attribute: name.to_string(),
            })
    }

    /// Handle a `StmtSimple` or `ColumnReference` element at a
    /// matching path. Elements elsewhere (showplans reuse
    /// `ColumnReference` all over) are ignored.
    fn on_element(&mut self, name: &str, element: &BytesStart<'_>) -> Result<()> {
        if name == "StmtSimple"
            && self.current.is_none()
            && self.stack_ends_with(&["BatchSequence", "Batch", "Statements"])
        {
            let sql = match self.attr_value(element, "StatementText")? {
                Some(text) if !text.is_empty() => parse_first(&text),
                _ => None,
            };
            self.current = Some(StatementBuilder {
                sql,
                params: ParameterMap::new(),
                depth: self.stack.len(),
            });
        } else if name == "ColumnReference"
            && self.current.is_some()
            && self.stack_ends_with(&["QueryPlan", "ParameterList"])
        {
            let column = self.required_attr(element, "Column")?;
            let data_type = self.required_attr(element, "ParameterDataType")?;
            let compiled_value = self.required_attr(element, "ParameterCompiledValue")?;
            if let Some(builder) = self.current.as_mut() {
                builder.params.insert(
                    column,
                    Parameter {
                        data_type,
                        compiled_value,
                    },
                );
            }
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<PlanStatement>> {
        loop {
            let (resolve, event) = self
                .reader
                .read_resolved_event()
                .map_err(|e| PlanSqlError::Document(e.to_string()))?;
            let in_ns =
                matches!(&resolve, ResolveResult::Bound(ns) if ns.0 == SHOWPLAN_NS.as_bytes());
            match event {
                Event::Start(element) => {
                    let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                    if in_ns {
                        self.on_element(&name, &element)?;
                    }
                    self.stack.push(name);
                }
                Event::Empty(element) => {
                    let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                    if in_ns {
                        self.on_element(&name, &element)?;
                        // An empty StmtSimple has no parameter list.
                        if let Some(finished) = self.finish_if_closed(&name) {
                            return Ok(Some(finished));
                        }
                    }
                }
                Event::End(_) => {
                    let name = self.stack.pop().unwrap_or_default();
                    if let Some(finished) = self.finish_if_closed(&name) {
                        return Ok(Some(finished));
                    }
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    /// Emit the pending statement when its `StmtSimple` closes.
    fn finish_if_closed(&mut self, name: &str) -> Option<PlanStatement> {
        let closes = name == "StmtSimple"
            && self
                .current
                .as_ref()
                .is_some_and(|b| b.depth == self.stack.len());
        if !closes {
            return None;
        }
        let builder = self.current.take()?;
        debug!(
            params = builder.params.len(),
            has_sql = builder.sql.is_some(),
            "plan statement read"
        );
        Some(PlanStatement {
            sql: builder.sql,
            params: builder.params,
        })
    }
}

impl Iterator for PlanReader<'_> {
    type Item = Result<PlanStatement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(statement)) => Some(Ok(statement)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
