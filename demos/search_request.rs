//! Builds a realistic search request body and prints it as pretty JSON.
//!
//! Run with: `cargo run --example search_request_demo`

use elastic_query_builder::prelude::*;
use serde_json::json;

fn main() -> elastic_query_builder::Result<()> {
    tracing_subscriber::fmt::init();

    let request = SearchBuilder::new()
        .from(0)
        .size(20)
        .source(json!(["title", "price", "published_at"]))
        .query(
            BoolQuery::new()
                .must(MatchQuery::new().field("title").query("rust in action"))
                .filter(TermQuery::new().field("status").value("published"))
                .filter(RangeQuery::new().field("price").gte(10).lt(100))
                .should(MatchPhraseQuery::new().field("summary").query("systems programming"))
                .minimum_should_match(0),
        )
        .aggregation(
            TermsAggregation::new()
                .name("categories")
                .field("category")
                .size(10)
                .order("_count", "desc")
                .aggregation(AvgAggregation::new().name("avg_price").field("price")),
        )
        .aggregation(CardinalityAggregation::new().name("publishers").field("publisher_id"))
        .sort(Sort::new().field("published_at").order("desc")?)
        .sort(Sort::new().field("price").order("asc")?.missing("_last"))
        .highlight(
            Highlight::new()
                .pre_tags("<em>", None)
                .post_tags("</em>", None)
                .fragment_size(120, None)
                .field("title")
                .field("summary"),
        );

    println!("{}", request.serialize_to_text(true)?);

    Ok(())
}
