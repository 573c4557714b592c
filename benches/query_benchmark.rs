use criterion::{Criterion, black_box, criterion_group, criterion_main};
use xml_doctree::{ChildId, Document, DocumentBuilder, NamePattern, ParentId};

fn create_test_document(num_rows: usize) -> Document {
    let mut builder = DocumentBuilder::new("bench");
    let data = builder.create_element(ParentId::Document, "data");
    builder.set_document_element(data).unwrap();

    let mut rows = Vec::with_capacity(num_rows);
    for i in 0..num_rows {
        let item = builder.create_element(data, "item");
        let id = builder.create_attribute(item, "id", format!("item_{i}"));
        let category = builder.create_attribute(item, "category", "test");
        builder.set_attributes(item, [id, category]).unwrap();

        let mut fields = Vec::new();
        for (name, value) in [
            ("name", format!("Item Number {i}")),
            ("value", (i * 100).to_string()),
            ("price", format!("{i}.99")),
        ] {
            let field = builder.create_element(item, name);
            let text = builder.create_text(field, &value);
            builder.set_children(field, [ChildId::from(text)]).unwrap();
            fields.push(ChildId::from(field));
        }
        builder.set_children(item, fields).unwrap();
        rows.push(ChildId::from(item));
    }
    builder.set_children(data, rows).unwrap();
    builder.build()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for size in [100, 10_000] {
        group.bench_function(format!("{size}_rows"), |b| {
            b.iter(|| create_test_document(black_box(size)))
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let doc = create_test_document(10_000);
    let pattern = NamePattern::new("name|price").unwrap();

    let mut group = c.benchmark_group("query");
    group.bench_function("children_by_name", |b| {
        b.iter(|| {
            let data = doc.document_element().unwrap();
            black_box(data.children("item").count())
        })
    });
    group.bench_function("attribute_lookup", |b| {
        b.iter(|| {
            let data = doc.document_element().unwrap();
            data.elements("item")
                .filter(|item| item.attr("category") == Some("test"))
                .count()
        })
    });
    group.bench_function("single_child_text", |b| {
        b.iter(|| {
            let data = doc.document_element().unwrap();
            data.elements("item")
                .map(|item| item.child("value").and_then(|v| v.text('#')).map(str::len))
                .filter_map(Result::ok)
                .sum::<usize>()
        })
    });
    group.bench_function("children_matching", |b| {
        b.iter(|| {
            let data = doc.document_element().unwrap();
            data.elements("item")
                .map(|item| item.children_matching(&pattern).count())
                .sum::<usize>()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_queries);
criterion_main!(benches);
