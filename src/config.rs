/// Directory the CLI looks in for source files when no path is given
pub const DEFAULT_DATA_DIR: &str = "data";

pub const DOJG_FILE: &str = "dojg.html";
pub const HJGP_FILE: &str = "hjgp.html";
pub const DOJP_FILE: &str = "dojp.csv";

/// `id` of the element holding the index rows in both HTML sources
pub const TABLE_BODY_ID: &str = "tablebody";

/// Separates synonymous spellings of one concept in table headings (after NFKC)
pub const ALTERNATE_SEPARATOR: char = '・';

/// Separates synonymous spellings of one concept in the particle CSV
pub const CSV_ALTERNATE_SEPARATOR: char = ',';

/// Exact header row of the particle CSV
pub const DOJP_HEADER: [&str; 2] = ["page", "entry"];

/// Joins cross-referenced page labels inside a single output cell
pub const PAGE_LIST_SEPARATOR: &str = ", ";

/// Buffer size for each output CSV writer
pub const CSV_BUFFER_SIZE: usize = 128 * 1024;
