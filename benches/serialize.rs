//! Serialization throughput for a composed search request body.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use elastic_query_builder::prelude::*;
use serde_json::json;

fn build_request() -> SearchBuilder {
    let mut query = BoolQuery::new()
        .must(MatchQuery::new().field("title").query("rust"))
        .filter(TermQuery::new().field("status").value("published"))
        .filter(RangeQuery::new().field("price").gte(10).lt(100));

    for tag in ["systems", "networking", "cli", "parsing", "async"] {
        query = query.should(TermQuery::new().field("tags").value(tag));
    }

    SearchBuilder::new()
        .from(0)
        .size(50)
        .source(json!(["title", "price"]))
        .query(query)
        .aggregation(
            TermsAggregation::new()
                .name("categories")
                .field("category")
                .size(25)
                .aggregation(AvgAggregation::new().name("avg_price").field("price"))
                .aggregation(MaxAggregation::new().name("max_price").field("price")),
        )
        .sort(
            Sort::new()
                .field("published_at")
                .order("desc")
                .expect("valid order"),
        )
        .highlight(
            Highlight::new()
                .pre_tags("<em>", None)
                .post_tags("</em>", None)
                .field("title"),
        )
}

fn bench_serialize(c: &mut Criterion) {
    let request = build_request();

    c.bench_function("serialize_value", |b| {
        b.iter(|| black_box(&request).serialize().unwrap())
    });

    c.bench_function("serialize_pretty_text", |b| {
        b.iter(|| black_box(&request).serialize_to_text(true).unwrap())
    });
}

criterion_group!(benches, bench_serialize);
criterion_main!(benches);
