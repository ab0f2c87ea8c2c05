// Built-in memory lifecycle scenarios

use super::by_language;
use crate::scenario::{
    Language, MemoryAction as A, MemoryProgram, MemoryScenario, MemoryStep as S,
};

pub fn memory_scenarios() -> Vec<MemoryScenario> {
    vec![
        stack_and_heap(),
        memory_leak(),
        ownership_transfer(),
        reference_counting(),
        garbage_collection(),
    ]
}

fn program(code: &str, steps: Vec<S>) -> MemoryProgram {
    MemoryProgram {
        code: code.trim_start_matches('\n').to_string(),
        steps,
    }
}

fn stack_and_heap() -> MemoryScenario {
    let c = program(
        r#"
void process(void) {
    int count = 3;
    int *buf = malloc(400);
    buf[0] = count;
    free(buf);
}

int main(void) {
    process();
    return 0;
}"#,
        vec![
            S::new(1, A::ScopeEnter).label("enter process()"),
            S::new(2, A::AllocateStack).block("count").size(4).owner("count"),
            S::new(3, A::AllocateStack).block("buf").size(8).owner("buf").points_to("data"),
            S::new(3, A::AllocateHeap).block("data").size(400).owner("buf"),
            S::new(5, A::Free).block("data").label("free(buf) releases the heap block"),
            S::new(6, A::Free).block("buf"),
            S::new(6, A::Free).block("count"),
            S::new(6, A::ScopeExit).label("stack frame popped"),
        ],
    );

    let rust = program(
        r#"
fn process() {
    let count = 3;
    let buf = vec![0i32; 100];
    println!("{}", buf[0] + count);
}

fn main() {
    process();
}"#,
        vec![
            S::new(1, A::ScopeEnter).label("enter process()"),
            S::new(2, A::AllocateStack).block("count").size(4).owner("count"),
            S::new(3, A::AllocateStack).block("buf").size(24).owner("buf").points_to("data"),
            S::new(3, A::AllocateHeap).block("data").size(400).owner("buf"),
            S::new(5, A::Free).block("data").label("buf dropped at end of scope"),
            S::new(5, A::Free).block("buf"),
            S::new(5, A::Free).block("count"),
            S::new(5, A::ScopeExit),
        ],
    );

    let go = program(
        r#"
func process() {
    count := 3
    buf := make([]int32, 100)
    fmt.Println(buf[0] + int32(count))
}

func main() {
    process()
    runtime.GC()
}"#,
        vec![
            S::new(1, A::ScopeEnter).label("enter process()"),
            S::new(2, A::AllocateStack).block("count").size(8).owner("count"),
            S::new(3, A::AllocateStack).block("buf").size(24).owner("buf").points_to("data"),
            S::new(3, A::AllocateHeap).block("data").size(400).owner("buf").label("slice escapes to the heap"),
            S::new(5, A::Free).block("buf"),
            S::new(5, A::Free).block("count"),
            S::new(5, A::ScopeExit),
            S::new(9, A::GcMark).block("data").label("unreachable, marked by the collector"),
            S::new(9, A::GcSweep).label("sweep reclaims marked blocks"),
        ],
    );

    let python = program(
        r#"
def process():
    count = 3
    buf = [0] * 100
    print(buf[0] + count)

process()"#,
        vec![
            S::new(1, A::ScopeEnter).label("enter process()"),
            S::new(2, A::AllocateHeap).block("count").size(28).owner("count"),
            S::new(3, A::AllocateStack).block("buf").size(8).owner("buf").points_to("data"),
            S::new(3, A::AllocateHeap).block("data").size(856).owner("buf"),
            S::new(4, A::ScopeExit).label("frame released, names go away"),
            S::new(4, A::Free).block("buf"),
            S::new(4, A::RemoveReference).block("data").label("list refcount hits zero"),
            S::new(4, A::RemoveReference).block("count"),
        ],
    );

    MemoryScenario {
        id: "stack-vs-heap".to_string(),
        title: "Stack vs Heap".to_string(),
        description: "Locals live in the stack frame while buffers are carved out of the heap."
            .to_string(),
        icon: "[]".to_string(),
        programs: by_language(vec![
            (Language::C, c),
            (Language::Rust, rust),
            (Language::Go, go),
            (Language::Python, python),
        ]),
    }
}

fn memory_leak() -> MemoryScenario {
    let c = program(
        r#"
void load(void) {
    char *cache = malloc(400);
    if (error()) {
        return;
    }
    free(cache);
}"#,
        vec![
            S::new(2, A::AllocateHeap).block("cache").size(400).owner("cache"),
            S::new(3, A::ScopeEnter).label("error branch taken"),
            S::new(4, A::Leak).block("cache").label("early return loses the only pointer"),
            S::new(4, A::ScopeExit),
        ],
    );

    let cpp = program(
        r#"
void load() {
    auto *cache = new Buffer(400);
    auto *index = new Buffer(64);
    if (error()) {
        delete index;
        throw LoadError();
    }
    delete cache;
}"#,
        vec![
            S::new(2, A::AllocateHeap).block("cache").size(400).owner("cache"),
            S::new(3, A::AllocateHeap).block("index").size(64).owner("index"),
            S::new(4, A::ScopeEnter),
            S::new(5, A::Free).block("index"),
            S::new(6, A::Leak).block("cache").label("exception skips the delete"),
            S::new(6, A::ScopeExit),
        ],
    );

    let python = program(
        r#"
class Node:
    def __init__(self):
        self.peer = None

a = Node()
b = Node()
a.peer = b
b.peer = a
del a, b"#,
        vec![
            S::new(5, A::AllocateHeap).block("a").size(56).owner("a"),
            S::new(6, A::AllocateHeap).block("b").size(56).owner("b"),
            S::new(7, A::AddReference).block("b").points_to("b"),
            S::new(8, A::AddReference).block("a"),
            S::new(9, A::RemoveReference).block("a").label("count drops to 1, cycle keeps it alive"),
            S::new(9, A::RemoveReference).block("b"),
            S::new(9, A::Leak).block("a").label("unreachable cycle"),
            S::new(9, A::Leak).block("b"),
        ],
    );

    MemoryScenario {
        id: "memory-leak".to_string(),
        title: "Memory Leak".to_string(),
        description: "Losing the last reference without freeing leaves an orphaned block."
            .to_string(),
        icon: "!!".to_string(),
        programs: by_language(vec![
            (Language::C, c),
            (Language::Cpp, cpp),
            (Language::Python, python),
        ]),
    }
}

fn ownership_transfer() -> MemoryScenario {
    let rust = program(
        r#"
fn main() {
    let s1 = String::from("hello");
    let s2 = s1;
    consume(s2);
}

fn consume(s: String) {
    println!("{}", s);
}"#,
        vec![
            S::new(2, A::AllocateStack).block("s1").size(24).owner("s1").points_to("text"),
            S::new(2, A::AllocateHeap).block("text").size(5).owner("s1"),
            S::new(3, A::TransferOwnership).block("text").target_owner("s2").label("move: s1 is no longer valid"),
            S::new(3, A::Free).block("s1"),
            S::new(3, A::AllocateStack).block("s2").size(24).owner("s2").points_to("text"),
            S::new(7, A::ScopeEnter).label("enter consume()"),
            S::new(4, A::TransferOwnership).block("text").target_owner("s"),
            S::new(4, A::Free).block("s2"),
            S::new(8, A::Free).block("text").label("s dropped when consume() returns"),
            S::new(9, A::ScopeExit),
        ],
    );

    let cpp = program(
        r#"
int main() {
    auto p1 = std::make_unique<Widget>();
    auto p2 = std::move(p1);
    sink(std::move(p2));
}

void sink(std::unique_ptr<Widget> w) {
}"#,
        vec![
            S::new(2, A::AllocateStack).block("p1").size(8).owner("p1").points_to("widget"),
            S::new(2, A::AllocateHeap).block("widget").size(32).owner("p1"),
            S::new(3, A::AllocateStack).block("p2").size(8).owner("p2").points_to("widget"),
            S::new(3, A::TransferOwnership).block("widget").target_owner("p2").label("p1 is now null"),
            S::new(7, A::ScopeEnter),
            S::new(4, A::TransferOwnership).block("widget").target_owner("w"),
            S::new(8, A::Free).block("widget").label("unique_ptr destructor"),
            S::new(8, A::ScopeExit),
            S::new(5, A::Free).block("p2"),
            S::new(5, A::Free).block("p1"),
        ],
    );

    let c = program(
        r#"
int main(void) {
    char *a = strdup("hello");
    char *b = a;
    a = NULL;
    free(b);
}"#,
        vec![
            S::new(2, A::AllocateStack).block("a").size(8).owner("a").points_to("text"),
            S::new(2, A::AllocateHeap).block("text").size(6).owner("a"),
            S::new(3, A::AllocateStack).block("b").size(8).owner("b").points_to("text"),
            S::new(4, A::TransferOwnership).block("text").target_owner("b").label("ownership is only a convention"),
            S::new(5, A::Free).block("text"),
        ],
    );

    MemoryScenario {
        id: "ownership-transfer".to_string(),
        title: "Ownership Transfer".to_string(),
        description: "A heap block changes owner; the last owner is responsible for releasing it."
            .to_string(),
        icon: "->".to_string(),
        programs: by_language(vec![
            (Language::C, c),
            (Language::Cpp, cpp),
            (Language::Rust, rust),
        ]),
    }
}

fn reference_counting() -> MemoryScenario {
    let python = program(
        r#"
data = [1, 2, 3]
alias = data
cache = {"k": data}
del alias
cache.clear()
del data"#,
        vec![
            S::new(1, A::AllocateHeap).block("list").size(88).owner("data"),
            S::new(2, A::AddReference).block("list").label("alias shares the list"),
            S::new(3, A::AllocateHeap).block("dict").size(232).owner("cache").points_to("list"),
            S::new(3, A::AddReference).block("list"),
            S::new(4, A::RemoveReference).block("list"),
            S::new(5, A::RemoveReference).block("list"),
            S::new(6, A::RemoveReference).block("list").label("count reaches zero, freed immediately"),
        ],
    );

    let swift = program(
        r#"
var a: Photo? = Photo()
var b = a
a = nil
b = nil"#,
        vec![
            S::new(1, A::AllocateStack).block("a").size(8).owner("a").points_to("photo"),
            S::new(1, A::AllocateHeap).block("photo").size(48).owner("a"),
            S::new(2, A::AllocateStack).block("b").size(8).owner("b").points_to("photo"),
            S::new(2, A::AddReference).block("photo").label("retain"),
            S::new(3, A::RemoveReference).block("photo").label("release"),
            S::new(4, A::RemoveReference).block("photo").label("deinit runs"),
        ],
    );

    MemoryScenario {
        id: "reference-counting".to_string(),
        title: "Reference Counting".to_string(),
        description: "Every new reference bumps a counter; the block dies when it reaches zero."
            .to_string(),
        icon: "#".to_string(),
        programs: by_language(vec![(Language::Python, python), (Language::Swift, swift)]),
    }
}

fn garbage_collection() -> MemoryScenario {
    let java = program(
        r#"
List<Order> orders = new ArrayList<>();
Order tmp = new Order();
orders.add(new Order());
tmp = null;
System.gc();"#,
        vec![
            S::new(1, A::AllocateStack).block("orders").size(8).owner("orders").points_to("list"),
            S::new(1, A::AllocateHeap).block("list").size(40).owner("orders"),
            S::new(2, A::AllocateStack).block("tmp").size(8).owner("tmp").points_to("o1"),
            S::new(2, A::AllocateHeap).block("o1").size(32).owner("tmp"),
            S::new(3, A::AllocateHeap).block("o2").size(32).owner("list"),
            S::new(4, A::GcMark).block("o1").label("no path from a root reaches o1"),
            S::new(5, A::GcSweep).label("collector reclaims garbage"),
        ],
    );

    let go = program(
        r#"
type Session struct{ buf []byte }

func main() {
    s := &Session{buf: make([]byte, 1024)}
    s = nil
    runtime.GC()
}"#,
        vec![
            S::new(4, A::ScopeEnter),
            S::new(5, A::AllocateStack).block("s").size(8).owner("s").points_to("session"),
            S::new(5, A::AllocateHeap).block("session").size(24).owner("s").points_to("buf"),
            S::new(5, A::AllocateHeap).block("buf").size(1024).owner("session"),
            S::new(6, A::GcMark).block("session"),
            S::new(6, A::GcMark).block("buf"),
            S::new(7, A::GcSweep),
            S::new(8, A::ScopeExit),
        ],
    );

    MemoryScenario {
        id: "garbage-collection".to_string(),
        title: "Garbage Collection".to_string(),
        description: "Unreachable blocks are marked first and only reclaimed by the sweep."
            .to_string(),
        icon: "GC".to_string(),
        programs: by_language(vec![(Language::Go, go), (Language::Java, java)]),
    }
}
