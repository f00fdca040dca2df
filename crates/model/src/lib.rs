pub mod core {
    pub mod asset;
    pub mod identifiers;
}

pub mod pagination {
    pub mod cursor;
    pub mod page;
}

pub mod records {
    pub mod enriched;
    pub mod result_set;
    pub mod row;
}
