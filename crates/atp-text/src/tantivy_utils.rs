use tantivy::schema::{Schema, TextFieldIndexing, TextOptions, IndexRecordOption, FAST, STORED};
use tantivy::tokenizer::{TextAnalyzer, WhitespaceTokenizer, LowerCaser};
use tantivy::Index;

pub const TOKENIZER_NAME: &str = "chunk_whitespace";
pub const POSITION_FIELD: &str = "position";
pub const TEXT_FIELD: &str = "text";

/// `position` is the chunk's corpus index; `text` is the chunk, indexed with
/// term frequencies for BM25 but not stored (the store owns the text).
pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	let _position_field = schema_builder.add_u64_field(POSITION_FIELD, STORED | FAST);
	let text_field_indexing = TextFieldIndexing::default().set_tokenizer(TOKENIZER_NAME).set_index_option(IndexRecordOption::WithFreqs);
	let text_options = TextOptions::default().set_indexing_options(text_field_indexing);
	let _text_field = schema_builder.add_text_field(TEXT_FIELD, text_options);
	schema_builder.build()
}

/// Lower-cased whitespace split. Tokenizers are not persisted with the index,
/// so this runs after every create and open.
pub fn register_tokenizer(index: &Index) {
	let tokenizer = TextAnalyzer::builder(WhitespaceTokenizer::default())
		.filter(LowerCaser)
		.build();
	index.tokenizers().register(TOKENIZER_NAME, tokenizer);
}

/// Query-side twin of the registered analyzer.
pub fn tokenize_query(query: &str) -> Vec<String> {
	query.to_lowercase().split_whitespace().map(str::to_string).collect()
}
