/// A search ordering the platform understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortingMethod {
    /// Presentation order, unique across the table.
    pub priority: u32,
    /// Value of the `index` search parameter.
    pub wire_key: &'static str,
    pub display_label: &'static str,
}

// https://docs.modrinth.com/api/operations/searchprojects/
// The labels on "newest" and "updated" look swapped. They are kept exactly as
// the launcher has always shown them until someone confirms which is wrong.
static SORTING_METHODS: [SortingMethod; 5] = [
    SortingMethod {
        priority: 1,
        wire_key: "relevance",
        display_label: "Sort by Relevance",
    },
    SortingMethod {
        priority: 2,
        wire_key: "downloads",
        display_label: "Sort by Downloads",
    },
    SortingMethod {
        priority: 3,
        wire_key: "follows",
        display_label: "Sort by Follows",
    },
    SortingMethod {
        priority: 4,
        wire_key: "newest",
        display_label: "Sort by Last Updated",
    },
    SortingMethod {
        priority: 5,
        wire_key: "updated",
        display_label: "Sort by Newest",
    },
];

pub fn sorting_methods() -> &'static [SortingMethod] {
    &SORTING_METHODS
}
