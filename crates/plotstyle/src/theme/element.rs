//! Theme setting values.
//!
//! Theme files describe element settings with the plotting library's
//! constructor syntax, for example:
//!
//! ```yaml
//! other_settings:
//!   panel.grid.minor: element_blank()
//!   plot.title: element_text(size = rel(1.2), face = "bold")
//!   legend.position: bottom
//! ```
//!
//! Strings that look like a call are parsed into an [`Element`] with a
//! closed grammar (see [`parse_call`](super::expr::parse_call)); only the
//! constructors listed below are known, and arguments must be literals.
//! Everything else is kept as a plain YAML value.
//!
//! | Constructor     | Parameters (positional order)                                              |
//! |-----------------|----------------------------------------------------------------------------|
//! | `element_text`  | family, face, colour, size, hjust, vjust, angle, lineheight, margin, inherit.blank |
//! | `element_line`  | colour, linewidth, linetype, lineend, inherit.blank                         |
//! | `element_rect`  | fill, colour, linewidth, linetype, inherit.blank                            |
//! | `element_blank` | (none)                                                                      |
//! | `margin`        | t, r, b, l, unit                                                            |
//! | `unit`          | x, units                                                                    |
//! | `rel`           | x                                                                           |
//! | `c`             | literal values, kept as a list                                              |
//!
//! `color` is accepted for `colour`, and `size` for `linewidth` on lines
//! and rects.
//!
//! # Example
//!
//! ```rust
//! use plotstyle::theme::{Element, Measure, SettingValue};
//!
//! let value = SettingValue::from_override("element_text(size = rel(1.2))").unwrap();
//! let Some(Element::Text(text)) = value.element() else { panic!() };
//! assert_eq!(text.size, Some(Measure::Relative { rel: 1.2 }));
//! ```

use std::fmt;

use serde::Serialize;
use serde_yaml::Value;

use super::expr::{parse_call, Arg, Call, Expr, ExpressionError};
use crate::palette::is_valid_color;

/// An absolute size or one relative to the inherited size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Measure {
    Absolute(f64),
    Relative { rel: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Measure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hjust: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vjust: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineheight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherit_blank: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linewidth: Option<Measure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherit_blank: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RectElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linewidth: Option<Measure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherit_blank: Option<bool>,
}

/// Four-sided spacing, in `unit` (points by default).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub t: f64,
    pub r: f64,
    pub b: f64,
    pub l: f64,
    pub unit: String,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            t: 0.0,
            r: 0.0,
            b: 0.0,
            l: 0.0,
            unit: "pt".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    pub value: f64,
    pub unit: String,
}

/// A theme element built from a constructor call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Element {
    Text(TextElement),
    Line(LineElement),
    Rect(RectElement),
    /// Draws nothing and assigns no space.
    Blank,
    Margin(Margin),
    Unit(Unit),
    Rel { factor: f64 },
}

const CONSTRUCTORS: &[&str] = &[
    "element_text",
    "element_line",
    "element_rect",
    "element_blank",
    "margin",
    "unit",
    "rel",
];

const TEXT_PARAMS: &[&str] = &[
    "family",
    "face",
    "colour",
    "size",
    "hjust",
    "vjust",
    "angle",
    "lineheight",
    "margin",
    "inherit.blank",
];
const LINE_PARAMS: &[&str] = &["colour", "linewidth", "linetype", "lineend", "inherit.blank"];
const RECT_PARAMS: &[&str] = &["fill", "colour", "linewidth", "linetype", "inherit.blank"];
const MARGIN_PARAMS: &[&str] = &["t", "r", "b", "l", "unit"];
const UNIT_PARAMS: &[&str] = &["x", "units"];
const REL_PARAMS: &[&str] = &["x"];

const COLOUR_ALIASES: &[(&str, &str)] = &[("color", "colour")];
const STROKE_ALIASES: &[(&str, &str)] = &[("color", "colour"), ("size", "linewidth")];

impl Element {
    /// Parses a constructor string such as `element_line(colour = "grey80")`.
    pub fn parse(input: &str) -> Result<Self, ExpressionError> {
        let call = parse_call(input)?;
        Self::from_call(input, &call)
    }

    fn from_call(input: &str, call: &Call) -> Result<Self, ExpressionError> {
        match call.name.as_str() {
            "element_text" => {
                let args = Bound::bind(input, call, TEXT_PARAMS, COLOUR_ALIASES)?;
                Ok(Element::Text(TextElement {
                    family: args.string("family")?,
                    face: args.string("face")?,
                    colour: args.colour("colour")?,
                    size: args.measure("size")?,
                    hjust: args.number("hjust")?,
                    vjust: args.number("vjust")?,
                    angle: args.number("angle")?,
                    lineheight: args.number("lineheight")?,
                    margin: args.margin("margin")?,
                    inherit_blank: args.boolean("inherit.blank")?,
                }))
            }
            "element_line" => {
                let args = Bound::bind(input, call, LINE_PARAMS, STROKE_ALIASES)?;
                Ok(Element::Line(LineElement {
                    colour: args.colour("colour")?,
                    linewidth: args.measure("linewidth")?,
                    linetype: args.linetype("linetype")?,
                    lineend: args.string("lineend")?,
                    inherit_blank: args.boolean("inherit.blank")?,
                }))
            }
            "element_rect" => {
                let args = Bound::bind(input, call, RECT_PARAMS, STROKE_ALIASES)?;
                Ok(Element::Rect(RectElement {
                    fill: args.colour("fill")?,
                    colour: args.colour("colour")?,
                    linewidth: args.measure("linewidth")?,
                    linetype: args.linetype("linetype")?,
                    inherit_blank: args.boolean("inherit.blank")?,
                }))
            }
            "element_blank" => {
                Bound::bind(input, call, &[], &[])?;
                Ok(Element::Blank)
            }
            "margin" => Margin::from_call(input, call).map(Element::Margin),
            "unit" => {
                let args = Bound::bind(input, call, UNIT_PARAMS, &[])?;
                Ok(Element::Unit(Unit {
                    value: args.required_number("x")?,
                    unit: args.required_string("units")?,
                }))
            }
            "rel" => {
                let args = Bound::bind(input, call, REL_PARAMS, &[])?;
                Ok(Element::Rel {
                    factor: args.required_number("x")?,
                })
            }
            other => Err(error_at(
                input,
                call.position,
                format!(
                    "unknown constructor '{}'; expected one of {}",
                    other,
                    CONSTRUCTORS.join(", ")
                ),
            )),
        }
    }
}

impl Margin {
    fn from_call(input: &str, call: &Call) -> Result<Self, ExpressionError> {
        let args = Bound::bind(input, call, MARGIN_PARAMS, &[])?;
        let default = Margin::default();
        Ok(Margin {
            t: args.number("t")?.unwrap_or(default.t),
            r: args.number("r")?.unwrap_or(default.r),
            b: args.number("b")?.unwrap_or(default.b),
            l: args.number("l")?.unwrap_or(default.l),
            unit: args.string("unit")?.unwrap_or(default.unit),
        })
    }
}

fn error_at(input: &str, position: usize, message: impl Into<String>) -> ExpressionError {
    ExpressionError {
        input: input.to_string(),
        position,
        message: message.into(),
    }
}

/// Call arguments matched to parameter names.
///
/// Named arguments are matched first; positional ones then fill the
/// remaining parameters in declaration order.
struct Bound<'c> {
    input: &'c str,
    call: &'c Call,
    values: Vec<(&'static str, &'c Arg)>,
}

impl<'c> Bound<'c> {
    fn bind(
        input: &'c str,
        call: &'c Call,
        params: &[&'static str],
        aliases: &[(&str, &'static str)],
    ) -> Result<Self, ExpressionError> {
        let mut values: Vec<(&'static str, &'c Arg)> = Vec::new();

        for arg in &call.args {
            let Some(name) = &arg.name else { continue };
            let canonical = aliases
                .iter()
                .find(|(alias, _)| *alias == name.as_str())
                .map(|(_, canonical)| *canonical)
                .or_else(|| params.iter().copied().find(|param| *param == name.as_str()))
                .ok_or_else(|| {
                    error_at(
                        input,
                        arg.position,
                        format!("{}() has no argument '{}'", call.name, name),
                    )
                })?;
            if values.iter().any(|(param, _)| *param == canonical) {
                return Err(error_at(
                    input,
                    arg.position,
                    format!("argument '{}' given more than once", canonical),
                ));
            }
            values.push((canonical, arg));
        }

        let mut free = params
            .iter()
            .copied()
            .filter(|param| !values.iter().any(|(bound, _)| bound == param))
            .collect::<Vec<_>>()
            .into_iter();
        for arg in call.args.iter().filter(|arg| arg.name.is_none()) {
            let param = free.next().ok_or_else(|| {
                error_at(
                    input,
                    arg.position,
                    format!("too many arguments to {}()", call.name),
                )
            })?;
            values.push((param, arg));
        }

        Ok(Self {
            input,
            call,
            values,
        })
    }

    fn get(&self, param: &str) -> Option<&'c Arg> {
        self.values
            .iter()
            .find(|(name, _)| *name == param)
            .map(|(_, arg)| *arg)
            .filter(|arg| arg.value != Expr::Null)
    }

    fn mismatch(&self, arg: &Arg, param: &str, expected: &str) -> ExpressionError {
        error_at(
            self.input,
            arg.position,
            format!("'{}' must be {}", param, expected),
        )
    }

    fn string(&self, param: &str) -> Result<Option<String>, ExpressionError> {
        self.get(param)
            .map(|arg| match &arg.value {
                Expr::Str(s) => Ok(s.clone()),
                _ => Err(self.mismatch(arg, param, "a string")),
            })
            .transpose()
    }

    fn number(&self, param: &str) -> Result<Option<f64>, ExpressionError> {
        self.get(param)
            .map(|arg| match &arg.value {
                Expr::Number(n) => Ok(*n),
                _ => Err(self.mismatch(arg, param, "a number")),
            })
            .transpose()
    }

    fn boolean(&self, param: &str) -> Result<Option<bool>, ExpressionError> {
        self.get(param)
            .map(|arg| match &arg.value {
                Expr::Bool(b) => Ok(*b),
                _ => Err(self.mismatch(arg, param, "TRUE or FALSE")),
            })
            .transpose()
    }

    fn colour(&self, param: &str) -> Result<Option<String>, ExpressionError> {
        let colour = self.string(param)?;
        if let (Some(value), Some(arg)) = (&colour, self.get(param)) {
            if !is_valid_color(value) {
                return Err(self.mismatch(arg, param, "a color name or hex code"));
            }
        }
        Ok(colour)
    }

    fn linetype(&self, param: &str) -> Result<Option<String>, ExpressionError> {
        self.get(param)
            .map(|arg| match &arg.value {
                Expr::Str(s) => Ok(s.clone()),
                Expr::Number(n) => Ok(n.to_string()),
                _ => Err(self.mismatch(arg, param, "a line type name or number")),
            })
            .transpose()
    }

    fn measure(&self, param: &str) -> Result<Option<Measure>, ExpressionError> {
        self.get(param)
            .map(|arg| match &arg.value {
                Expr::Number(n) => Ok(Measure::Absolute(*n)),
                Expr::Call(call) if call.name == "rel" => {
                    match Element::from_call(self.input, call)? {
                        Element::Rel { factor } => Ok(Measure::Relative { rel: factor }),
                        _ => Err(self.mismatch(arg, param, "a number or rel()")),
                    }
                }
                _ => Err(self.mismatch(arg, param, "a number or rel()")),
            })
            .transpose()
    }

    fn margin(&self, param: &str) -> Result<Option<Margin>, ExpressionError> {
        self.get(param)
            .map(|arg| match &arg.value {
                Expr::Call(call) if call.name == "margin" => Margin::from_call(self.input, call),
                _ => Err(self.mismatch(arg, param, "a margin()")),
            })
            .transpose()
    }

    fn required_number(&self, param: &str) -> Result<f64, ExpressionError> {
        self.number(param)?.ok_or_else(|| self.missing(param))
    }

    fn required_string(&self, param: &str) -> Result<String, ExpressionError> {
        self.string(param)?.ok_or_else(|| self.missing(param))
    }

    fn missing(&self, param: &str) -> ExpressionError {
        error_at(
            self.input,
            self.call.position,
            format!("{}() requires '{}'", self.call.name, param),
        )
    }
}

// =============================================================================
// Rendering back to constructor syntax
// =============================================================================

struct Args<'f, 'a> {
    f: &'f mut fmt::Formatter<'a>,
    first: bool,
}

impl<'f, 'a> Args<'f, 'a> {
    fn open(f: &'f mut fmt::Formatter<'a>, name: &str) -> Result<Self, fmt::Error> {
        write!(f, "{}(", name)?;
        Ok(Self { f, first: true })
    }

    fn arg(&mut self, name: &str, value: Option<impl fmt::Display>) -> fmt::Result {
        let Some(value) = value else { return Ok(()) };
        if !self.first {
            self.f.write_str(", ")?;
        }
        self.first = false;
        write!(self.f, "{} = {}", name, value)
    }

    fn close(self) -> fmt::Result {
        self.f.write_str(")")
    }
}

struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            if c == '"' || c == '\\' {
                f.write_str("\\")?;
            }
            write!(f, "{}", c)?;
        }
        f.write_str("\"")
    }
}

fn quoted(s: &Option<String>) -> Option<Quoted<'_>> {
    s.as_deref().map(Quoted)
}

struct RBool(bool);

impl fmt::Display for RBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "TRUE" } else { "FALSE" })
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Absolute(n) => write!(f, "{}", n),
            Measure::Relative { rel } => write!(f, "rel({})", rel),
        }
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut args = Args::open(f, "margin")?;
        args.arg("t", Some(self.t))?;
        args.arg("r", Some(self.r))?;
        args.arg("b", Some(self.b))?;
        args.arg("l", Some(self.l))?;
        args.arg("unit", Some(Quoted(&self.unit)))?;
        args.close()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Text(text) => {
                let mut args = Args::open(f, "element_text")?;
                args.arg("family", quoted(&text.family))?;
                args.arg("face", quoted(&text.face))?;
                args.arg("colour", quoted(&text.colour))?;
                args.arg("size", text.size)?;
                args.arg("hjust", text.hjust)?;
                args.arg("vjust", text.vjust)?;
                args.arg("angle", text.angle)?;
                args.arg("lineheight", text.lineheight)?;
                args.arg("margin", text.margin.as_ref())?;
                args.arg("inherit.blank", text.inherit_blank.map(RBool))?;
                args.close()
            }
            Element::Line(line) => {
                let mut args = Args::open(f, "element_line")?;
                args.arg("colour", quoted(&line.colour))?;
                args.arg("linewidth", line.linewidth)?;
                args.arg("linetype", quoted(&line.linetype))?;
                args.arg("lineend", quoted(&line.lineend))?;
                args.arg("inherit.blank", line.inherit_blank.map(RBool))?;
                args.close()
            }
            Element::Rect(rect) => {
                let mut args = Args::open(f, "element_rect")?;
                args.arg("fill", quoted(&rect.fill))?;
                args.arg("colour", quoted(&rect.colour))?;
                args.arg("linewidth", rect.linewidth)?;
                args.arg("linetype", quoted(&rect.linetype))?;
                args.arg("inherit.blank", rect.inherit_blank.map(RBool))?;
                args.close()
            }
            Element::Blank => f.write_str("element_blank()"),
            Element::Margin(margin) => fmt::Display::fmt(margin, f),
            Element::Unit(unit) => write!(f, "unit({}, {})", unit.value, Quoted(&unit.unit)),
            Element::Rel { factor } => write!(f, "rel({})", factor),
        }
    }
}

// =============================================================================
// Setting values
// =============================================================================

/// The value of one theme setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Element(Element),
    /// Any non-constructor value: numbers, strings such as `"bottom"`,
    /// booleans, or lists from `c(...)`.
    Literal(Value),
}

impl SettingValue {
    /// Interprets a value read from a theme file.
    pub fn from_yaml(value: Value) -> Result<Self, ExpressionError> {
        match value {
            Value::String(s) if looks_like_call(&s) => Self::parse_call_string(&s),
            other => Ok(SettingValue::Literal(other)),
        }
    }

    /// Interprets a `key=value` override given as text.
    ///
    /// Constructor calls are parsed as elements; anything else is read as a
    /// YAML scalar, so `12` is a number and `bottom` a string.
    pub fn from_override(raw: &str) -> Result<Self, ExpressionError> {
        if looks_like_call(raw) {
            return Self::parse_call_string(raw);
        }
        let value = serde_yaml::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.to_string()));
        Ok(SettingValue::Literal(value))
    }

    pub fn element(&self) -> Option<&Element> {
        match self {
            SettingValue::Element(element) => Some(element),
            SettingValue::Literal(_) => None,
        }
    }

    pub fn literal(&self) -> Option<&Value> {
        match self {
            SettingValue::Literal(value) => Some(value),
            SettingValue::Element(_) => None,
        }
    }

    fn parse_call_string(input: &str) -> Result<Self, ExpressionError> {
        let call = parse_call(input)?;
        if call.name == "c" {
            return call
                .args
                .iter()
                .map(|arg| literal_value(input, arg))
                .collect::<Result<Vec<_>, _>>()
                .map(|values| SettingValue::Literal(Value::Sequence(values)));
        }
        Element::from_call(input, &call).map(SettingValue::Element)
    }
}

impl From<Element> for SettingValue {
    fn from(element: Element) -> Self {
        SettingValue::Element(element)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Element(element) => fmt::Display::fmt(element, f),
            SettingValue::Literal(value) => fmt_literal(value, f),
        }
    }
}

fn fmt_literal(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::Null => f.write_str("NULL"),
        Value::Bool(b) => write!(f, "{}", RBool(*b)),
        // Floats print in shortest form, so `1.0` renders as `1`
        Value::Number(n) => match n.as_f64().filter(|_| n.is_f64()) {
            Some(float) => write!(f, "{}", float),
            None => write!(f, "{}", n),
        },
        Value::String(s) => write!(f, "{}", Quoted(s)),
        Value::Sequence(values) => {
            f.write_str("c(")?;
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                fmt_literal(value, f)?;
            }
            f.write_str(")")
        }
        Value::Tagged(tagged) => fmt_literal(&tagged.value, f),
        Value::Mapping(_) => f.write_str("<mapping>"),
    }
}

fn literal_value(input: &str, arg: &Arg) -> Result<Value, ExpressionError> {
    if arg.name.is_some() {
        return Err(error_at(input, arg.position, "c() takes no named arguments"));
    }
    match &arg.value {
        Expr::Number(n) => Ok(Value::from(*n)),
        Expr::Str(s) => Ok(Value::String(s.clone())),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Null => Ok(Value::Null),
        Expr::Call(_) => Err(error_at(input, arg.position, "c() takes only literal values")),
    }
}

/// Any string with a parenthesis is read as a constructor call, so
/// malformed calls fail the load instead of becoming plain strings.
fn looks_like_call(s: &str) -> bool {
    s.contains('(')
}
