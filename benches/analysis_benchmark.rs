/// Benchmark module for commit retrieval, aggregation and author handling.
/// Measures revwalk plus file listing, multi-repository merging, and the
/// in-memory filter and grouping passes.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use git2::{Repository, Signature};
use git_digest::analysis::aggregate_commits_async;
use git_digest::{aggregate_commits, filter_by_authors, group_by_author, CommitQuery};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::runtime::Runtime;

const AUTHORS: [(&str, &str); 4] = [
    ("Test User", "test@example.com"),
    ("Another User", "another@example.com"),
    ("Alice Smith", "alice@example.com"),
    ("Bob Jones", "bob@example.com"),
];

/// Set up a test repository for benchmarking
/// Creates a repository with `commits` commits rotating through several authors
///
/// # Returns
/// * `(TempDir, PathBuf)` - Temporary directory and repository path
fn setup_large_test_repo(name: &str, commits: usize) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().join(name);
    let repo = Repository::init(&repo_path).unwrap();

    for i in 0..commits {
        let file_name = format!("file_{}.txt", i % 25);
        let content = format!("Content for revision {}\n", i);
        fs::write(repo_path.join(&file_name), content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(&file_name)).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let (name, email) = AUTHORS[i % AUTHORS.len()];
        let author = Signature::now(name, email).unwrap();

        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(
            Some("HEAD"),
            &author,
            &author,
            &format!("Update {}", file_name),
            &tree,
            &parents,
        )
        .unwrap();
    }

    (temp_dir, repo_path)
}

/// Benchmark retrieval and aggregation
///
/// # Arguments
/// * `c` - Criterion benchmark configuration
fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");
    let rt = Runtime::new().unwrap();
    let (_api_dir, api) = setup_large_test_repo("api", 200);
    let (_web_dir, web) = setup_large_test_repo("web", 200);
    let paths = vec![api.clone(), web];

    let days = CommitQuery {
        days: Some(7),
        ..Default::default()
    };
    let count = CommitQuery {
        count: Some(20),
        ..Default::default()
    };

    group.bench_function("single_repo_days", |b| {
        b.iter(|| aggregate_commits(&[&api], black_box(&days)).unwrap());
    });

    group.bench_function("two_repos_days", |b| {
        b.iter(|| aggregate_commits(&paths, black_box(&days)).unwrap());
    });

    group.bench_function("two_repos_count", |b| {
        b.iter(|| aggregate_commits(&paths, black_box(&count)).unwrap());
    });

    group.bench_function("two_repos_async", |b| {
        b.iter(|| {
            rt.block_on(async { aggregate_commits_async(paths.clone(), days.clone()).await.unwrap() })
        });
    });

    group.finish();
}

/// Benchmark author filtering and grouping
///
/// # Arguments
/// * `c` - Criterion benchmark configuration
fn bench_authors(c: &mut Criterion) {
    let mut group = c.benchmark_group("authors");
    let (_temp_dir, repo_path) = setup_large_test_repo("api", 400);
    let commits = aggregate_commits(
        &[&repo_path],
        &CommitQuery {
            days: Some(1),
            ..Default::default()
        },
    )
    .unwrap()
    .commits;
    let filters = vec!["alice".to_string(), "example.com".to_string(), "nobody".to_string()];

    group.bench_function("filter_by_authors", |b| {
        b.iter(|| filter_by_authors(commits.clone(), black_box(&filters)));
    });

    group.bench_function("group_by_author", |b| {
        b.iter(|| group_by_author(black_box(&commits)));
    });

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench_aggregation, bench_authors
);
criterion_main!(benches);
