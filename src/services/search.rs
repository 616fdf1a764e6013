use nucleo_matcher::{
    pattern::{CaseMatching, Normalization, Pattern},
    Matcher,
};

use crate::data::Label;

/// Filter repository labels using fuzzy matching.
/// Returns the indices of matching labels, best match first.
pub fn filter_labels(labels: &[Label], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..labels.len()).collect();
    }

    let mut matcher = Matcher::new(nucleo_matcher::Config::DEFAULT);
    let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);

    let haystacks: Vec<Haystack> = labels
        .iter()
        .enumerate()
        .map(|(idx, label)| Haystack {
            idx,
            text: match &label.description {
                Some(description) => format!("{} {}", label.name, description),
                None => label.name.clone(),
            },
        })
        .collect();

    // match_list returns (item, score) sorted by score, descending
    let matches = pattern.match_list(haystacks.iter(), &mut matcher);

    matches
        .into_iter()
        .map(|(haystack, _score)| haystack.idx)
        .collect()
}

struct Haystack {
    idx: usize,
    text: String,
}

impl AsRef<str> for Haystack {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(name: &str) -> Label {
        Label {
            name: name.to_string(),
            color: String::new(),
            description: None,
        }
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let labels = vec![label("bug"), label("area:core")];
        assert_eq!(filter_labels(&labels, ""), vec![0, 1]);
    }

    #[test]
    fn query_narrows_to_matching_labels() {
        let labels = vec![label("bug"), label("area:core"), label("area:infra")];
        let matches = filter_labels(&labels, "infra");
        assert_eq!(matches, vec![2]);
    }
}
