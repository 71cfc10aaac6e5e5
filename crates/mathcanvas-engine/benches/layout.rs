use criterion::{Criterion, black_box, criterion_group, criterion_main};

use mathcanvas_engine::editing::{Cmd, Expression, TextKind};
use mathcanvas_engine::render::measure;

/// Build a fraction tower with exponents and roots, the worst realistic
/// shape for the recursive passes.
fn nested_expression(depth: usize) -> Expression {
    let mut expr = Expression::new();
    for _ in 0..depth {
        expr.apply(Cmd::InsertText {
            kind: TextKind::Number,
            text: "2".to_string(),
        })
        .unwrap();
        expr.apply(Cmd::InsertExponent).unwrap();
        expr.apply(Cmd::InsertRoot { index: 2 }).unwrap();
        expr.apply(Cmd::InsertText {
            kind: TextKind::Number,
            text: "3".to_string(),
        })
        .unwrap();
        expr.exit_to_parent_right();
        expr.exit_to_parent_right();
        expr.apply(Cmd::InsertText {
            kind: TextKind::Operator,
            text: "+".to_string(),
        })
        .unwrap();
        expr.apply(Cmd::InsertFraction).unwrap();
    }
    expr
}

fn bench_measure(c: &mut Criterion) {
    let expr = nested_expression(10);
    c.bench_function("measure nested expression", |b| {
        b.iter(|| measure(black_box(expr.pool()), expr.root(), 100))
    });
}

fn bench_latex(c: &mut Criterion) {
    let expr = nested_expression(10);
    c.bench_function("serialize nested expression", |b| {
        b.iter(|| black_box(&expr).to_latex().unwrap())
    });
}

fn bench_editing(c: &mut Criterion) {
    c.bench_function("build nested expression", |b| {
        b.iter(|| nested_expression(black_box(10)))
    });
}

criterion_group!(benches, bench_measure, bench_latex, bench_editing);
criterion_main!(benches);
