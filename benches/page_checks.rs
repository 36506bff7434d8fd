use criterion::{black_box, criterion_group, criterion_main, Criterion};
use diet_ui::decorate::heading_icon;
use diet_ui::query;
use diet_ui::session::Session;
use diet_ui::validate::is_email_shaped;

fn bench_page_checks(c: &mut Criterion) {
    let cookie = "theme=dark; lang=en; csrftoken=abcdef0123456789; user_id=42; tz=UTC";
    c.bench_function("session_from_cookie", |b| {
        b.iter(|| Session::from_cookie_header(black_box(cookie)))
    });

    c.bench_function("email_shape", |b| {
        b.iter(|| is_email_shaped(black_box("someone.long-name@sub.example.org")))
    });

    c.bench_function("heading_icon_miss", |b| {
        b.iter(|| heading_icon(black_box("Weekly hydration and sleep targets")))
    });

    c.bench_function("message_param", |b| {
        b.iter(|| query::param(black_box("?tab=goals&message=Profile%20updated+successfully"), "message"))
    });
}

criterion_group!(benches, bench_page_checks);
criterion_main!(benches);
