#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "backing tables do not match the graph arena \
         (node rows {node_rows} vs arena {node_count}, edge rows {edge_rows} vs arena {edge_count})"
    )]
    TableMismatch {
        node_rows: usize,
        node_count: usize,
        edge_rows: usize,
        edge_count: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
