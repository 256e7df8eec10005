//! Built-in companion corpus.

use super::error::RegistryResult;
use super::registry::TaxonomyRegistry;
use super::types::{CorpusEntry, Tier};

pub const FUNDAMENTALS_OF_ARCHITECTURE: &str = "Fundamentals of Software Architecture";
pub const DATA_INTENSIVE_APPLICATIONS: &str = "Designing Data-Intensive Applications";
pub const ARCHITECTURE_PATTERNS: &str = "Architecture Patterns with Python";
pub const DOMAIN_DRIVEN_DESIGN: &str = "Domain-Driven Design";
pub const FLUENT_PYTHON: &str = "Fluent Python";
pub const PYTHON_COOKBOOK: &str = "Python Cookbook";
pub const EFFECTIVE_PYTHON: &str = "Effective Python";
pub const HIGH_PERFORMANCE_PYTHON: &str = "High Performance Python";
pub const PYTHON_CONCURRENCY: &str = "Python Concurrency with asyncio";
pub const BUILDING_MICROSERVICES: &str = "Building Microservices";
pub const RELEASE_IT: &str = "Release It!";
pub const PRAGMATIC_PROGRAMMER: &str = "The Pragmatic Programmer";
pub const TDD_WITH_PYTHON: &str = "Test-Driven Development with Python";

fn entries() -> Vec<CorpusEntry> {
    vec![
        CorpusEntry::new(FUNDAMENTALS_OF_ARCHITECTURE, Tier::ArchitectureSpine, 1.2)
            .with_triggers([
                "architecture", "architect", "modularity", "coupling", "cohesion",
                "characteristics", "tradeoffs", "layered", "monolith", "microkernel",
                "pipeline", "quanta", "scalability", "elasticity", "deployability",
                "fitness", "governance", "components", "topology", "style",
            ])
            .cascades_to([ARCHITECTURE_PATTERNS, BUILDING_MICROSERVICES]),
        CorpusEntry::new(DATA_INTENSIVE_APPLICATIONS, Tier::ArchitectureSpine, 1.1)
            .with_triggers([
                "replication", "partitioning", "sharding", "consistency", "consensus",
                "transactions", "isolation", "serializability", "storage", "index",
                "btree", "lsm", "stream", "batch", "encoding", "schema", "durability",
                "latency", "throughput", "reliability", "database", "log",
            ])
            .cascades_to([HIGH_PERFORMANCE_PYTHON]),
        CorpusEntry::new(ARCHITECTURE_PATTERNS, Tier::ArchitectureSpine, 1.0)
            .with_triggers([
                "repository", "aggregate", "service", "layer", "unit", "work", "domain",
                "model", "events", "messagebus", "command", "handler", "cqrs",
                "dependency", "injection", "bootstrap", "adapter", "port", "orm",
                "abstraction",
            ])
            .cascades_to([DOMAIN_DRIVEN_DESIGN, TDD_WITH_PYTHON]),
        CorpusEntry::new(DOMAIN_DRIVEN_DESIGN, Tier::ArchitectureSpine, 0.9)
            .with_triggers([
                "domain", "ubiquitous", "language", "bounded", "context", "entity",
                "value", "object", "aggregate", "factory", "repository", "invariant",
                "specification", "anticorruption", "subdomain", "strategic", "tactical",
                "model",
            ]),
        CorpusEntry::new(FLUENT_PYTHON, Tier::Implementation, 1.0)
            .with_triggers([
                "dunder", "protocol", "sequence", "mapping", "generator", "iterator",
                "decorator", "closure", "descriptor", "metaclass", "coroutine",
                "comprehension", "slicing", "unpacking", "dataclass", "typing",
                "hashable", "immutable", "special", "methods", "attribute",
            ])
            .cascades_to([EFFECTIVE_PYTHON, PYTHON_COOKBOOK]),
        CorpusEntry::new(PYTHON_COOKBOOK, Tier::Implementation, 0.8)
            .with_triggers([
                "recipe", "strings", "text", "regex", "dates", "files", "csv", "json",
                "xml", "iterators", "generators", "functions", "classes", "modules",
                "packages", "network", "sockets", "testing", "debugging", "exceptions",
            ]),
        CorpusEntry::new(EFFECTIVE_PYTHON, Tier::Implementation, 0.9)
            .with_triggers([
                "pythonic", "idiom", "comprehension", "generator", "keyword", "arguments",
                "decorator", "class", "inheritance", "mixin", "property", "metaclass",
                "concurrency", "thread", "subprocess", "robustness", "exceptions",
                "docstring", "testing", "performance",
            ]),
        CorpusEntry::new(HIGH_PERFORMANCE_PYTHON, Tier::Implementation, 0.9)
            .with_triggers([
                "profiling", "performance", "memory", "cpu", "cache", "numpy", "vectorization",
                "cython", "numba", "compilation", "multiprocessing", "parallel", "gil",
                "benchmark", "optimization", "allocation", "array", "clusters", "latency",
            ])
            .cascades_to([PYTHON_CONCURRENCY]),
        CorpusEntry::new(PYTHON_CONCURRENCY, Tier::Implementation, 0.8)
            .with_triggers([
                "asyncio", "async", "await", "coroutine", "event", "loop", "task", "future",
                "concurrency", "nonblocking", "socket", "queue", "semaphore", "lock",
                "thread", "multiprocessing", "gather", "timeout", "cancellation",
                "streams",
            ]),
        CorpusEntry::new(BUILDING_MICROSERVICES, Tier::EngineeringPractices, 1.0)
            .with_triggers([
                "microservice", "microservices", "service", "boundary", "deployment",
                "integration", "choreography", "orchestration", "saga", "gateway",
                "observability", "monitoring", "resilience", "contract", "versioning",
                "decomposition", "team", "ownership", "container", "kubernetes",
            ])
            .cascades_to([RELEASE_IT]),
        CorpusEntry::new(RELEASE_IT, Tier::EngineeringPractices, 0.8)
            .with_triggers([
                "stability", "production", "timeout", "circuit", "breaker", "bulkhead",
                "failure", "cascading", "capacity", "resilience", "backpressure",
                "shedding", "deployment", "operations", "outage", "chaos", "recovery",
                "steady", "state",
            ]),
        CorpusEntry::new(PRAGMATIC_PROGRAMMER, Tier::EngineeringPractices, 0.7)
            .with_triggers([
                "pragmatic", "dry", "orthogonality", "reversibility", "tracer", "bullets",
                "prototype", "estimating", "refactoring", "decoupling", "contracts",
                "assertions", "automation", "craftsmanship", "debugging", "requirements",
                "entropy", "broken", "windows",
            ]),
        CorpusEntry::new(TDD_WITH_PYTHON, Tier::EngineeringPractices, 0.8)
            .with_triggers([
                "test", "tests", "testing", "unittest", "pytest", "tdd", "mock", "mocks",
                "fixture", "fixtures", "functional", "integration", "refactor", "red",
                "green", "selenium", "assertion", "coverage", "isolation",
            ])
            .cascades_to([PRAGMATIC_PROGRAMMER]),
    ]
}

/// Builds the built-in registry.
///
/// Fails only if the table above is inconsistent, which the unit tests guard against.
pub fn default_registry() -> RegistryResult<TaxonomyRegistry> {
    TaxonomyRegistry::new(entries())
}
