use super::{Element, namespace_for_prefix};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Predicate {
    attribute: String,
    value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    namespace: &'static str,
    local: String,
    predicate: Option<Predicate>,
}

impl Step {
    fn matches(&self, element: &Element) -> bool {
        element.is(self.namespace, &self.local)
            && self
                .predicate
                .as_ref()
                .is_none_or(|p| element.attribute(&p.attribute) == Some(p.value.as_str()))
    }
}

/// Compiled element path
///
/// Supports `a:b/c:d`, a leading `./` or `.//` and one `[@attr="value"]`
/// predicate per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementPath {
    steps: Vec<Step>,
}

impl ElementPath {
    /// Compile a path; `None` when it uses an unknown prefix or bad syntax.
    pub fn parse(path: &str) -> Option<Self> {
        let (first_axis, rest) = if let Some(rest) = path.strip_prefix(".//") {
            (Axis::Descendant, rest)
        } else if let Some(rest) = path.strip_prefix("./") {
            (Axis::Child, rest)
        } else {
            (Axis::Child, path)
        };

        let mut steps = Vec::new();
        for (i, raw) in split_steps(rest).into_iter().enumerate() {
            let axis = if i == 0 { first_axis } else { Axis::Child };
            steps.push(parse_step(raw, axis)?);
        }
        if steps.is_empty() {
            return None;
        }
        Some(Self { steps })
    }

    /// Evaluate against `start`, returning matches in document order.
    pub fn select<'a>(&self, start: &'a Element) -> Vec<&'a Element> {
        let mut current = vec![start];
        for step in &self.steps {
            let mut next = Vec::new();
            for element in current {
                match step.axis {
                    Axis::Child => next.extend(element.child_elements().filter(|c| step.matches(c))),
                    Axis::Descendant => next.extend(
                        element
                            .descendants()
                            .into_iter()
                            .filter(|c| step.matches(c)),
                    ),
                }
            }
            current = next;
        }
        current
    }
}

fn split_steps(path: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in path.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => {
                parts.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&path[start..]);
    parts
}

fn parse_step(raw: &str, axis: Axis) -> Option<Step> {
    let (name, predicate) = match raw.split_once('[') {
        Some((name, rest)) => (name, Some(parse_predicate(rest.strip_suffix(']')?)?)),
        None => (raw, None),
    };
    let (prefix, local) = name.split_once(':')?;
    if local.is_empty() {
        return None;
    }
    Some(Step {
        axis,
        namespace: namespace_for_prefix(prefix)?,
        local: local.to_string(),
        predicate,
    })
}

fn parse_predicate(raw: &str) -> Option<Predicate> {
    let (attribute, value) = raw.strip_prefix('@')?.split_once('=')?;
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))?;
    Some(Predicate {
        attribute: attribute.trim().to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_descendant_path_with_predicate() {
        let path = ElementPath::parse(r#".//sawx:expr[@xsi:type="sawx:sqlExpression"]"#).unwrap();
        assert_eq!(path.steps.len(), 1);
        assert_eq!(path.steps[0].axis, Axis::Descendant);
        assert_eq!(path.steps[0].local, "expr");
        let predicate = path.steps[0].predicate.as_ref().unwrap();
        assert_eq!(predicate.attribute, "xsi:type");
        assert_eq!(predicate.value, "sawx:sqlExpression");
    }

    #[test]
    fn test_parse_child_chain() {
        let path = ElementPath::parse("./saw:criteria/saw:columns/saw:column").unwrap();
        assert_eq!(path.steps.len(), 3);
        assert!(path.steps.iter().all(|s| s.axis == Axis::Child));
    }

    #[test]
    fn test_rejects_unknown_prefix_and_missing_prefix() {
        assert!(ElementPath::parse("foo:bar").is_none());
        assert!(ElementPath::parse("column").is_none());
        assert!(ElementPath::parse("").is_none());
    }

    #[test]
    fn test_split_ignores_slash_inside_predicate() {
        assert_eq!(
            split_steps(r#"saw:a[@name="x/y"]/saw:b"#),
            vec![r#"saw:a[@name="x/y"]"#, "saw:b"]
        );
    }
}
