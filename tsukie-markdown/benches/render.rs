#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  reason = "Fine in benchmarks"
)]
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tsukie_markdown::{MarkdownOptions, MarkdownProcessor};

const POST_SMALL: &str = "# Hello World

Some **text** with a [link](https://example.org) and an image:

![A cat](/images/cat.png)
";

const POST_LARGE: &str = r#"# Notes on building a blog

Welcome to the first post. This one is long on purpose so the pipeline has
something to chew on: raw HTML, figures, tables and a few code blocks.

<div class="callout">Raw <strong>HTML</strong> passes through untouched.</div>

## Setup

Install the tools and clone the [repository](https://github.com/tsukie/tsukie).
The [about page](https://tsukie.com/about) is internal.

```rust
use std::collections::HashMap;

fn main() {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in "a b a c b a".split_whitespace() {
        *counts.entry(word).or_default() += 1;
    }
    println!("{counts:?}");
}
```

```ts
export function greet(name: string): string {
  return `hello ${name}`;
}
```

## Gallery

![First](/images/one.png)
![Second](/images/two.png)

| Feature   | Supported |
|-----------|-----------|
| Tables    | yes       |
| ~~Flash~~ | no        |

- [x] write the post
- [ ] publish it

## Setup

The duplicate heading above gets its own id.

<p>undefined</p>
"#;

fn bench_render(c: &mut Criterion) {
  let mut group = c.benchmark_group("render");

  let plain = MarkdownProcessor::new(MarkdownOptions {
    highlight_code: false,
    ..Default::default()
  })
  .unwrap();
  let highlighted = MarkdownProcessor::new(MarkdownOptions::default()).unwrap();

  for (size, input) in [("small", POST_SMALL), ("large", POST_LARGE)] {
    group.bench_with_input(
      BenchmarkId::new("plain", size),
      &input,
      |b, markdown| {
        b.iter(|| plain.render(black_box(markdown)).unwrap());
      },
    );

    group.bench_with_input(
      BenchmarkId::new("highlighted", size),
      &input,
      |b, markdown| {
        b.iter(|| highlighted.render(black_box(markdown)).unwrap());
      },
    );
  }

  group.finish();
}

fn bench_render_document(c: &mut Criterion) {
  let processor = MarkdownProcessor::new(MarkdownOptions::default()).unwrap();

  c.bench_function("render_document/large", |b| {
    b.iter(|| processor.render_document(black_box(POST_LARGE)).unwrap());
  });
}

criterion_group!(benches, bench_render, bench_render_document);
criterion_main!(benches);
