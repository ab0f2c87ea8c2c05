// Built-in concurrency scenarios

use super::by_language;
use crate::scenario::{
    ConcurrencyImpl, ConcurrencyModel, ConcurrencyScenario, Language, TaskDefinition,
    TaskKind,
};

pub fn concurrency_scenarios() -> Vec<ConcurrencyScenario> {
    vec![web_request(), parallel_downloads(), cpu_crunch()]
}

fn implementation(
    model: ConcurrencyModel,
    max_concurrent: Option<usize>,
    description: &str,
    code: &str,
) -> ConcurrencyImpl {
    ConcurrencyImpl {
        code: code.trim_start_matches('\n').to_string(),
        model,
        max_concurrent,
        description: description.to_string(),
    }
}

fn web_request() -> ConcurrencyScenario {
    let tasks = vec![
        TaskDefinition::new("fetch-user", "Fetch user", 200, TaskKind::Network),
        TaskDefinition::new("read-config", "Read config", 150, TaskKind::Io),
        TaskDefinition::new("resize-image", "Resize image", 2000, TaskKind::Cpu).blocking(),
    ];

    let javascript = implementation(
        ConcurrencyModel::EventLoop,
        None,
        "One thread runs every callback; the CPU-heavy resize stalls everything behind it.",
        r#"
const user = await fetchUser(id);
const config = await fs.promises.readFile("app.json");
const thumb = resizeImage(upload); // synchronous, blocks the loop
res.send({ user, config, thumb });"#,
    );

    let go = implementation(
        ConcurrencyModel::Goroutines,
        None,
        "Each handler step gets its own goroutine; the runtime multiplexes them onto OS threads.",
        r#"
var wg sync.WaitGroup
wg.Add(3)
go func() { defer wg.Done(); user = fetchUser(id) }()
go func() { defer wg.Done(); config = readConfig() }()
go func() { defer wg.Done(); thumb = resize(upload) }()
wg.Wait()"#,
    );

    let java = implementation(
        ConcurrencyModel::Threads,
        Some(4),
        "A fixed pool of four platform threads, one task per thread.",
        r#"
ExecutorService pool = Executors.newFixedThreadPool(4);
Future<User> user = pool.submit(() -> fetchUser(id));
Future<Config> config = pool.submit(() -> readConfig());
Future<Image> thumb = pool.submit(() -> resize(upload));"#,
    );

    let rust = implementation(
        ConcurrencyModel::AsyncAwait,
        Some(4),
        "Futures are polled by a multi-threaded executor with four workers.",
        r#"
let (user, config, thumb) = tokio::join!(
    fetch_user(id),
    tokio::fs::read_to_string("app.json"),
    tokio::task::spawn_blocking(move || resize(upload)),
);"#,
    );

    let python = implementation(
        ConcurrencyModel::Multiprocessing,
        Some(4),
        "Worker processes sidestep the GIL at the cost of a full interpreter each.",
        r#"
with Pool(processes=4) as pool:
    user = pool.apply_async(fetch_user, (user_id,))
    config = pool.apply_async(read_config)
    thumb = pool.apply_async(resize, (upload,))
    results = [r.get() for r in (user, config, thumb)]"#,
    );

    ConcurrencyScenario {
        id: "web-request".to_string(),
        title: "Handling a Web Request".to_string(),
        description: "Network, disk and CPU work needed to answer one request.".to_string(),
        icon: "<>".to_string(),
        tasks,
        implementations: by_language(vec![
            (Language::JavaScript, javascript),
            (Language::Go, go),
            (Language::Java, java),
            (Language::Rust, rust),
            (Language::Python, python),
        ]),
    }
}

fn parallel_downloads() -> ConcurrencyScenario {
    let tasks = (1..=6)
        .map(|n| {
            TaskDefinition::new(
                &format!("download-{}", n),
                &format!("Download part {}", n),
                300 + 100 * n as u64,
                TaskKind::Network,
            )
        })
        .collect();

    let javascript = implementation(
        ConcurrencyModel::EventLoop,
        None,
        "Callbacks are handled one after another on the single loop thread.",
        r#"
for (const part of parts) {
    await download(part);
}"#,
    );

    let go = implementation(
        ConcurrencyModel::Goroutines,
        None,
        "Goroutines are cheap enough to start one per part.",
        r#"
for _, part := range parts {
    go download(part, results)
}"#,
    );

    let java = implementation(
        ConcurrencyModel::Threads,
        Some(3),
        "A bounded pool of three threads shares the six downloads.",
        r#"
ExecutorService pool = Executors.newFixedThreadPool(3);
parts.forEach(p -> pool.submit(() -> download(p)));"#,
    );

    let python = implementation(
        ConcurrencyModel::Multiprocessing,
        Some(2),
        "Two worker processes take turns with the parts.",
        r#"
with Pool(processes=2) as pool:
    pool.map(download, parts)"#,
    );

    ConcurrencyScenario {
        id: "parallel-downloads".to_string(),
        title: "Parallel Downloads".to_string(),
        description: "Six independent network transfers of increasing size.".to_string(),
        icon: "vv".to_string(),
        tasks,
        implementations: by_language(vec![
            (Language::JavaScript, javascript),
            (Language::Go, go),
            (Language::Java, java),
            (Language::Python, python),
        ]),
    }
}

fn cpu_crunch() -> ConcurrencyScenario {
    let tasks = vec![
        TaskDefinition::new("hash-a", "Hash chunk A", 800, TaskKind::Cpu).blocking(),
        TaskDefinition::new("hash-b", "Hash chunk B", 800, TaskKind::Cpu).blocking(),
        TaskDefinition::new("hash-c", "Hash chunk C", 800, TaskKind::Cpu).blocking(),
        TaskDefinition::new("hash-d", "Hash chunk D", 800, TaskKind::Cpu).blocking(),
        TaskDefinition::new("write-index", "Write index", 250, TaskKind::Io),
    ];

    let javascript = implementation(
        ConcurrencyModel::EventLoop,
        None,
        "Pure computation never yields, so every chunk runs back to back.",
        r#"
const digests = chunks.map(hashChunk);
await fs.promises.writeFile("index", digests.join("\n"));"#,
    );

    let c = implementation(
        ConcurrencyModel::Threads,
        Some(4),
        "pthreads, one per core.",
        r#"
for (int i = 0; i < 4; i++)
    pthread_create(&tid[i], NULL, hash_chunk, &chunks[i]);
for (int i = 0; i < 4; i++)
    pthread_join(tid[i], NULL);
write_index(digests);"#,
    );

    let rust = implementation(
        ConcurrencyModel::Threads,
        Some(4),
        "Scoped threads borrow the chunks without copying them.",
        r#"
std::thread::scope(|s| {
    for chunk in &chunks {
        s.spawn(move || hash_chunk(chunk));
    }
});
write_index(&digests)?;"#,
    );

    let go = implementation(
        ConcurrencyModel::Goroutines,
        None,
        "GOMAXPROCS decides how many goroutines truly run at once.",
        r#"
for _, c := range chunks {
    go func(c []byte) { digests <- hash(c) }(c)
}"#,
    );

    let python = implementation(
        ConcurrencyModel::Multiprocessing,
        Some(4),
        "Separate processes are the only way to use every core from CPython.",
        r#"
with ProcessPoolExecutor(max_workers=4) as ex:
    digests = list(ex.map(hash_chunk, chunks))
write_index(digests)"#,
    );

    ConcurrencyScenario {
        id: "cpu-crunch".to_string(),
        title: "CPU-bound Hashing".to_string(),
        description: "Four equal compute chunks followed by a small write.".to_string(),
        icon: "%%".to_string(),
        tasks,
        implementations: by_language(vec![
            (Language::C, c),
            (Language::Go, go),
            (Language::JavaScript, javascript),
            (Language::Python, python),
            (Language::Rust, rust),
        ]),
    }
}
