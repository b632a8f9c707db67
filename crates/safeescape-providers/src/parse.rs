//! Tolerant parsing of advisory answers.
//!
//! Models are asked for bare JSON but do not always comply. The parser tries,
//! in order: the raw text, the contents of a fenced code block, and both of
//! those with trailing commas removed.

use safeescape_planner::AdvisoryError;
use safeescape_types::Location;
use serde::Deserialize;
use tracing::debug;

/// Most destinations planned from one answer (primary plus two alternatives).
///
/// Applied after unsafe categories are dropped, so the parser keeps every
/// usable proposal.
pub const MAX_DESTINATIONS: usize = 3;

/// A destination proposed by the model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProposedDestination {
    /// Place name.
    pub name: String,
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east.
    pub longitude: f64,
    /// Provider-style category tag, possibly empty.
    #[serde(default)]
    pub category: String,
    /// Why the model picked it.
    #[serde(default)]
    pub reason: Option<String>,
}

impl ProposedDestination {
    /// Coordinates as a [`Location`], unvalidated.
    pub const fn location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A parsed advisory answer.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ParsedAdvice {
    /// Proposed destinations in the model's order of preference.
    #[serde(default)]
    pub destinations: Vec<ProposedDestination>,
    /// Free-text guidance for the requester.
    #[serde(default)]
    pub guidance: Vec<String>,
}

/// Parse a model answer.
///
/// Destinations with invalid coordinates or blank names are dropped; the
/// rest are kept in the model's order.
///
/// # Errors
///
/// Returns [`AdvisoryError::Parse`] if no strategy yields the expected JSON
/// shape or no usable destination remains.
pub fn parse_advice(raw: &str) -> Result<ParsedAdvice, AdvisoryError> {
    let mut advice = try_parse(raw.trim())
        .ok_or_else(|| AdvisoryError::Parse(format!("no JSON advice found in: {}", raw.trim())))?;

    advice.destinations.retain(|d| {
        let usable = !d.name.trim().is_empty() && d.location().validate().is_ok();
        if !usable {
            debug!(name = d.name, "dropping unusable proposed destination");
        }
        usable
    });
    advice.guidance.retain(|g| !g.trim().is_empty());

    if advice.destinations.is_empty() {
        return Err(AdvisoryError::Parse(
            "answer contained no usable destinations".to_owned(),
        ));
    }
    Ok(advice)
}

fn try_parse(text: &str) -> Option<ParsedAdvice> {
    let block = extract_code_block(text);
    [Some(text), block]
        .into_iter()
        .flatten()
        .find_map(|candidate| {
            serde_json::from_str(candidate)
                .ok()
                .or_else(|| serde_json::from_str(&strip_trailing_commas(candidate)).ok())
        })
}

/// Contents of the first fenced code block, with any language tag removed.
fn extract_code_block(text: &str) -> Option<&str> {
    let (_, after_fence) = text.split_once("```")?;
    let (_, body) = after_fence.split_once('\n')?;
    let (inner, _) = body.split_once("```")?;
    Some(inner.trim())
}

/// Remove commas that directly precede a closing brace or bracket.
///
/// Commas inside string literals are left alone.
fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_comma = false;
    let mut held = String::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if pending_comma {
            if c.is_whitespace() {
                held.push(c);
                continue;
            }
            if c != '}' && c != ']' {
                out.push(',');
            }
            out.push_str(&held);
            held.clear();
            pending_comma = false;
        }
        match c {
            ',' => pending_comma = true,
            '"' => {
                in_string = true;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    if pending_comma {
        out.push(',');
        out.push_str(&held);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CLEAN: &str = r#"{
        "destinations": [
            {"name": "Wankhede Stadium", "latitude": 18.9389, "longitude": 72.8258,
             "category": "stadium", "reason": "Raised stands, large capacity"},
            {"name": "St. Xavier's College", "latitude": 18.943, "longitude": 72.8317,
             "category": "university"}
        ],
        "guidance": ["Avoid the Grant Road underpass.", "Carry drinking water."]
    }"#;

    #[test]
    fn parses_clean_json() {
        let advice = parse_advice(CLEAN).unwrap();
        assert_eq!(advice.destinations.len(), 2);
        assert_eq!(advice.destinations[0].category, "stadium");
        assert_eq!(
            advice.destinations[0].reason.as_deref(),
            Some("Raised stands, large capacity")
        );
        assert_eq!(advice.destinations[1].reason, None);
        assert_eq!(advice.guidance.len(), 2);
    }

    #[test]
    fn parses_fenced_block_with_prose() {
        let raw = format!("Here is my suggestion:\n```json\n{CLEAN}\n```\nStay safe.");
        let advice = parse_advice(&raw).unwrap();
        assert_eq!(advice.destinations.len(), 2);
    }

    #[test]
    fn repairs_trailing_commas() {
        let raw = r#"```
{"destinations": [{"name": "Azad Maidan", "latitude": 18.94, "longitude": 72.83,},],
 "guidance": ["Move away from buildings, walls, and poles.",],}
```"#;
        let advice = parse_advice(raw).unwrap();
        assert_eq!(advice.destinations[0].name, "Azad Maidan");
        assert_eq!(
            advice.guidance,
            vec!["Move away from buildings, walls, and poles.".to_owned()]
        );
    }

    #[test]
    fn commas_inside_strings_survive() {
        assert_eq!(
            strip_trailing_commas(r#"{"a": "x, }", "b": [1, 2,],}"#),
            r#"{"a": "x, }", "b": [1, 2]}"#
        );
    }

    #[test]
    fn drops_invalid_and_keeps_order() {
        let raw = r#"{"destinations": [
            {"name": "Nowhere", "latitude": 95.0, "longitude": 10.0},
            {"name": "  ", "latitude": 19.0, "longitude": 72.0},
            {"name": "A", "latitude": 19.01, "longitude": 72.8},
            {"name": "B", "latitude": 19.02, "longitude": 72.8},
            {"name": "C", "latitude": 19.03, "longitude": 72.8},
            {"name": "D", "latitude": 19.04, "longitude": 72.8}
        ]}"#;
        let advice = parse_advice(raw).unwrap();
        let names: Vec<&str> = advice.destinations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
        assert!(advice.guidance.is_empty());
    }

    #[test]
    fn rejects_prose_and_empty_answers() {
        assert!(matches!(
            parse_advice("I cannot help with that."),
            Err(AdvisoryError::Parse(_))
        ));
        assert!(matches!(
            parse_advice(r#"{"destinations": [], "guidance": ["Stay indoors."]}"#),
            Err(AdvisoryError::Parse(_))
        ));
    }
}
