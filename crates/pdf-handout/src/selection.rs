//! Page selection helpers
//!
//! The selection is an ordered list of 0-based source page indices. Its
//! order is the order pages appear in the handout.

use crate::types::*;

/// The pages to plan: the selection, or every page in natural order when
/// nothing is selected.
pub fn effective_selection(selected: &[usize], page_count: usize) -> Vec<usize> {
    if selected.is_empty() {
        (0..page_count).collect()
    } else {
        selected.to_vec()
    }
}

/// Check that every selected index exists in the source
pub fn validate_selection(selected: &[usize], page_count: usize) -> Result<()> {
    match selected.iter().find(|&&index| index >= page_count) {
        Some(&index) => Err(HandoutError::SourceUnavailable {
            index,
            count: page_count,
        }),
        None => Ok(()),
    }
}

/// Add a page to the end of the selection, or remove it if already selected
pub fn toggle_page(selected: &mut Vec<usize>, index: usize) {
    if let Some(pos) = selected.iter().position(|&i| i == index) {
        selected.remove(pos);
    } else {
        selected.push(index);
    }
}

/// Parse a 1-based page list such as `"1,3,5-7"` into 0-based indices.
///
/// Order is kept as written, so `"3,1"` selects page 3 first. Descending
/// ranges (`"7-5"`) are expanded in descending order.
pub fn parse_page_ranges(spec: &str, page_count: usize) -> Result<Vec<usize>> {
    let mut pages = Vec::new();

    for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((a, b)) => (parse_page_number(a)?, parse_page_number(b)?),
            None => {
                let n = parse_page_number(part)?;
                (n, n)
            }
        };

        for number in [start, end] {
            if number > page_count {
                return Err(HandoutError::SourceUnavailable {
                    index: number - 1,
                    count: page_count,
                });
            }
        }

        if start <= end {
            pages.extend((start..=end).map(|n| n - 1));
        } else {
            pages.extend((end..=start).rev().map(|n| n - 1));
        }
    }

    if pages.is_empty() {
        return Err(HandoutError::EmptySelection);
    }
    Ok(pages)
}

fn parse_page_number(text: &str) -> Result<usize> {
    match text.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(HandoutError::Config(format!(
            "'{}' is not a page number (pages start at 1)",
            text.trim()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_means_all_pages() {
        assert_eq!(effective_selection(&[], 3), vec![0, 1, 2]);
        assert_eq!(effective_selection(&[2, 0], 3), vec![2, 0]);
    }

    #[test]
    fn test_validate_selection() {
        assert!(validate_selection(&[0, 2], 3).is_ok());
        match validate_selection(&[0, 3], 3) {
            Err(HandoutError::SourceUnavailable { index, count }) => {
                assert_eq!((index, count), (3, 3));
            }
            other => panic!("Expected SourceUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_toggle_keeps_insertion_order() {
        let mut selected = vec![0, 1, 2];
        toggle_page(&mut selected, 1);
        assert_eq!(selected, vec![0, 2]);
        toggle_page(&mut selected, 1);
        assert_eq!(selected, vec![0, 2, 1]);
    }

    #[test]
    fn test_parse_page_ranges() {
        assert_eq!(parse_page_ranges("1,3,5-7", 10).unwrap(), vec![0, 2, 4, 5, 6]);
        assert_eq!(parse_page_ranges(" 3 , 1 ", 10).unwrap(), vec![2, 0]);
        assert_eq!(parse_page_ranges("4-2", 10).unwrap(), vec![3, 2, 1]);
    }

    #[test]
    fn test_parse_page_ranges_errors() {
        assert!(matches!(
            parse_page_ranges("0", 10),
            Err(HandoutError::Config(_))
        ));
        assert!(matches!(
            parse_page_ranges("2-x", 10),
            Err(HandoutError::Config(_))
        ));
        assert!(matches!(
            parse_page_ranges("9-12", 10),
            Err(HandoutError::SourceUnavailable { index: 11, .. })
        ));
        assert!(matches!(
            parse_page_ranges(" , ", 10),
            Err(HandoutError::EmptySelection)
        ));
    }
}
