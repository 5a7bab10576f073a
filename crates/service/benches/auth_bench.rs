use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::{domain::{LoginInput, RegisterInput}, token::TokenIssuer, AuthService};
use service::mock::{MockStore, RecordingMailer};

fn bench_login(c: &mut Criterion) {
    let store = Arc::new(MockStore::default());
    let tokens = TokenIssuer::new("secret", chrono::Duration::hours(12), chrono::Duration::hours(24));
    let svc = AuthService::new(store, tokens, Arc::new(RecordingMailer::default()), "http://localhost:8000");

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    let _ = rt.block_on(svc.register(RegisterInput { username: "bench".into(), email: "bench@example.com".into(), password: "Benchmark1".into() }));

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.login(LoginInput { username: "bench".into(), password: "Benchmark1".into() })).unwrap();
        });
    });

    let token = rt.block_on(svc.login(LoginInput { username: "bench".into(), password: "Benchmark1".into() })).unwrap();
    c.bench_function("auth_authenticate_bearer", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.authenticate(&token.access_token)).unwrap();
        });
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);
