use serde::{Deserialize, Serialize};

/// `?page=N` query. Kept as a raw string so garbage falls back to page 1
/// instead of rejecting the request. Integers below 1 are out of range and
/// come back as 0, which [`paginate`] maps to the last page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn number(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(|n| if n < 1 { 0 } else { usize::try_from(n).unwrap_or(usize::MAX) })
            .unwrap_or(1)
    }
}

/// One page of a listing, as handed to templates under `page_obj`.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub per_page: usize,
    pub count: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            object_list: self.object_list.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            per_page: self.per_page,
            count: self.count,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

/// Slices `items` into page `number` of size `per_page`.
///
/// Page 0 and pages past the end map to the last page. An empty list still
/// has one (empty) page.
pub fn paginate<T>(items: Vec<T>, per_page: usize, number: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let count = items.len();
    let num_pages = count.div_ceil(per_page).max(1);
    let number = if number == 0 || number > num_pages {
        num_pages
    } else {
        number
    };

    let start = (number - 1) * per_page;
    let object_list = items.into_iter().skip(start).take(per_page).collect();

    Page {
        object_list,
        number,
        num_pages,
        per_page,
        count,
        has_previous: number > 1,
        has_next: number < num_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_items_split_ten_and_three() {
        let items: Vec<u32> = (0..13).collect();

        let first = paginate(items.clone(), 10, 1);
        assert_eq!(first.len(), 10);
        assert_eq!(first.num_pages, 2);
        assert!(first.has_next);
        assert!(!first.has_previous);

        let second = paginate(items, 10, 2);
        assert_eq!(second.object_list, vec![10, 11, 12]);
        assert!(!second.has_next);
    }

    #[test]
    fn out_of_range_pages_go_to_the_last_page() {
        let items: Vec<u32> = (0..13).collect();
        assert_eq!(paginate(items.clone(), 10, 0).number, 2);
        assert_eq!(paginate(items, 10, 99).number, 2);
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let page = paginate(Vec::<u32>::new(), 10, 3);
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(page.is_empty());
    }

    #[test]
    fn unparsable_page_query_means_first_page() {
        let query = PageQuery {
            page: Some("abc".into()),
        };
        assert_eq!(query.number(), 1);
        assert_eq!(PageQuery::default().number(), 1);
    }

    #[test]
    fn zero_and_negative_pages_are_out_of_range() {
        for raw in ["0", "-3"] {
            let query = PageQuery {
                page: Some(raw.into()),
            };
            assert_eq!(query.number(), 0);
            assert_eq!(paginate((0..13).collect::<Vec<u32>>(), 10, query.number()).number, 2);
        }
    }
}
