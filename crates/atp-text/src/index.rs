use anyhow::{Result, anyhow};
use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::debug;

use atp_core::types::ChunkPos;

use crate::tantivy_utils::{build_schema, register_tokenizer, tokenize_query, POSITION_FIELD, TEXT_FIELD};

const DISK_WRITER_BUDGET: usize = 50_000_000;
const RAM_WRITER_BUDGET: usize = 15_000_000;

/// BM25 statistics over an ordered set of chunks.
///
/// Writers run single-threaded so documents land in segments in insertion
/// order, which keeps tie ordering identical between builds.
pub struct SparseIndex {
	reader: IndexReader,
	position_field: Field,
	text_field: Field,
}

impl SparseIndex {
	/// Build a persistent index in `dir` (created if needed, must be empty).
	pub fn create_in_dir<'a>(dir: &Path, docs: impl IntoIterator<Item = (ChunkPos, &'a str)>) -> Result<Self> {
		std::fs::create_dir_all(dir)?;
		let index = Index::create_in_dir(dir, build_schema())?;
		Self::populate(index, docs, DISK_WRITER_BUDGET)
	}

	/// Build a throwaway index over a candidate pool. Positions stay corpus positions.
	pub fn in_ram<'a>(docs: impl IntoIterator<Item = (ChunkPos, &'a str)>) -> Result<Self> {
		let index = Index::create_in_ram(build_schema());
		Self::populate(index, docs, RAM_WRITER_BUDGET)
	}

	pub fn open_in_dir(dir: &Path) -> Result<Self> {
		let index = Index::open_in_dir(dir)?;
		Self::from_index(index)
	}

	/// True when `dir` holds a committed tantivy index.
	pub fn exists(dir: &Path) -> bool {
		dir.is_dir() && MmapDirectory::open(dir).ok().and_then(|d| Index::exists(&d).ok()).unwrap_or(false)
	}

	fn populate<'a>(index: Index, docs: impl IntoIterator<Item = (ChunkPos, &'a str)>, budget: usize) -> Result<Self> {
		register_tokenizer(&index);
		let schema = index.schema();
		let position_field = schema.get_field(POSITION_FIELD)?;
		let text_field = schema.get_field(TEXT_FIELD)?;
		let mut writer: IndexWriter = index.writer_with_num_threads(1, budget)?;
		let mut count = 0usize;
		for (pos, text) in docs {
			writer.add_document(doc!(position_field => pos as u64, text_field => text))?;
			count += 1;
		}
		writer.commit()?;
		drop(writer);
		debug!(count, "sparse index populated");
		Self::from_index(index)
	}

	fn from_index(index: Index) -> Result<Self> {
		register_tokenizer(&index);
		let schema = index.schema();
		let position_field = schema.get_field(POSITION_FIELD)?;
		let text_field = schema.get_field(TEXT_FIELD)?;
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		Ok(Self { reader, position_field, text_field })
	}

	pub fn document_count(&self) -> u64 { self.reader.searcher().num_docs() }

	/// Up to `k` positions by descending BM25 score, ties by ascending position.
	/// Documents sharing no term with the query are never returned.
	pub fn top_positions(&self, query: &str, k: usize) -> Result<Vec<ChunkPos>> {
		let terms = tokenize_query(query);
		if terms.is_empty() || k == 0 { return Ok(Vec::new()); }
		let clauses: Vec<(Occur, Box<dyn Query>)> = terms
			.iter()
			.map(|t| {
				let term = Term::from_field_text(self.text_field, t);
				(Occur::Should, Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)) as Box<dyn Query>)
			})
			.collect();
		let query = BooleanQuery::new(clauses);
		let searcher = self.reader.searcher();
		let top_docs = searcher.search(&query, &TopDocs::with_limit(k))?;
		let mut hits = Vec::with_capacity(top_docs.len());
		for (score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr)?;
			let pos = doc.get_first(self.position_field).and_then(|v| v.as_u64()).ok_or_else(|| anyhow!("sparse document without position"))?;
			hits.push((score, pos as ChunkPos));
		}
		hits.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
		Ok(hits.into_iter().map(|(_, pos)| pos).collect())
	}
}
