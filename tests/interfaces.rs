use crucible_di::{
    Constructor, DiError, Injectable, InterfaceBinding, Lifetime, Resolver, ServiceCollection,
};
use std::sync::Arc;

// Five-deep capability chain, mirrored by a single concrete type.
trait IntProvider: Send + Sync {
    fn x(&self) -> i32;
}
trait LevelA: IntProvider {}
trait LevelB: LevelA {}
trait LevelC: LevelB {}
trait LevelD: LevelC {}

struct IntService {
    x: i32,
}

impl IntProvider for IntService {
    fn x(&self) -> i32 {
        self.x
    }
}
impl LevelA for IntService {}
impl LevelB for IntService {}
impl LevelC for IntService {}
impl LevelD for IntService {}

impl Injectable for IntService {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(vec![], |_| Ok(IntService { x: 5 }))]
    }

    fn interfaces() -> Vec<InterfaceBinding> {
        vec![
            InterfaceBinding::new::<Self, dyn IntProvider>(|s| s),
            InterfaceBinding::new::<Self, dyn LevelA>(|s| s),
            InterfaceBinding::new::<Self, dyn LevelB>(|s| s),
            InterfaceBinding::new::<Self, dyn LevelC>(|s| s),
            InterfaceBinding::new::<Self, dyn LevelD>(|s| s),
        ]
    }
}

fn data_ptr<T: ?Sized>(arc: &Arc<T>) -> *const () {
    Arc::as_ptr(arc) as *const ()
}

#[test]
fn test_whole_chain_resolves_to_one_instance() {
    let mut sc = ServiceCollection::new();
    sc.register_with::<IntService, _>(Lifetime::Singleton, |_| Ok(IntService { x: 5 }));

    let sp = sc.build();

    let concrete = sp.get_required::<IntService>();
    let a = sp.get_required_trait::<dyn LevelA>();
    let b = sp.get_required_trait::<dyn LevelB>();
    let c = sp.get_required_trait::<dyn LevelC>();
    let provider = sp.get_required_trait::<dyn IntProvider>();

    assert_eq!(concrete.x, 5);
    assert_eq!(a.x(), 5);
    assert_eq!(b.x(), 5);
    assert_eq!(c.x(), 5);
    assert_eq!(provider.x(), 5);

    // One singleton behind every interface in the chain
    let root = data_ptr(&concrete);
    assert_eq!(data_ptr(&a), root);
    assert_eq!(data_ptr(&b), root);
    assert_eq!(data_ptr(&c), root);
    assert_eq!(data_ptr(&provider), root);
}

#[test]
fn test_chain_resolution_with_constructible_strategy() {
    let mut sc = ServiceCollection::new();
    sc.register::<IntService>(Lifetime::Singleton);

    let sp = sc.build();

    let concrete = sp.get_required::<IntService>();
    let d = sp.get_required_trait::<dyn LevelD>();

    assert_eq!(d.x(), 5);
    assert_eq!(data_ptr(&d), data_ptr(&concrete));
}

#[test]
fn test_exact_trait_registration_beats_capability_match() {
    struct Override;
    impl IntProvider for Override {
        fn x(&self) -> i32 {
            41
        }
    }

    let mut sc = ServiceCollection::new();
    sc.register::<IntService>(Lifetime::Singleton);
    sc.add_singleton_trait::<dyn IntProvider>(Arc::new(Override));

    let sp = sc.build();

    // The explicit trait registration wins over the interface scan
    let provider = sp.get_required_trait::<dyn IntProvider>();
    assert_eq!(provider.x(), 41);

    // The rest of the chain still routes to the concrete registration
    let a = sp.get_required_trait::<dyn LevelA>();
    assert_eq!(a.x(), 5);
}

#[test]
fn test_two_implementors_make_interface_ambiguous() {
    struct OtherService;
    impl IntProvider for OtherService {
        fn x(&self) -> i32 {
            9
        }
    }
    impl Injectable for OtherService {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(vec![], |_| Ok(OtherService))]
        }
        fn interfaces() -> Vec<InterfaceBinding> {
            vec![InterfaceBinding::new::<Self, dyn IntProvider>(|s| s)]
        }
    }

    let mut sc = ServiceCollection::new();
    sc.register::<IntService>(Lifetime::Singleton);
    sc.register::<OtherService>(Lifetime::Singleton);

    let sp = sc.build();

    match sp.get_trait::<dyn IntProvider>() {
        Err(DiError::AmbiguousRegistration { requested, candidates }) => {
            assert!(requested.contains("IntProvider"));
            assert_eq!(candidates.len(), 2);
            assert!(candidates.iter().any(|c| c.contains("IntService")));
            assert!(candidates.iter().any(|c| c.contains("OtherService")));
        }
        other => panic!("expected AmbiguousRegistration, got {:?}", other.map(|_| ())),
    }

    // The ambiguity is per-request: both concrete types still resolve,
    // and the unshared part of the chain is still unique
    assert_eq!(sp.get_required::<IntService>().x, 5);
    assert_eq!(sp.get_required_trait::<dyn LevelA>().x(), 5);
}

#[test]
fn test_scoped_concrete_shares_instance_with_interfaces_in_frame() {
    let mut sc = ServiceCollection::new();
    sc.register::<IntService>(Lifetime::Scoped);

    let sp = sc.build();
    let scope = sp.create_scope();

    let concrete = scope.get_required::<IntService>();
    let a = scope.get_required_trait::<dyn LevelA>();
    assert_eq!(data_ptr(&a), data_ptr(&concrete));

    // A different frame gets a different instance, chain included
    let scope2 = sp.create_scope();
    let a2 = scope2.get_required_trait::<dyn LevelA>();
    assert_ne!(data_ptr(&a2), data_ptr(&a));
}

#[test]
fn test_unmatched_interface_is_unresolvable() {
    trait Unrelated: Send + Sync {}

    let mut sc = ServiceCollection::new();
    sc.register::<IntService>(Lifetime::Singleton);

    let sp = sc.build();

    match sp.get_trait::<dyn Unrelated>() {
        Err(DiError::Unresolvable(name)) => assert!(name.contains("Unrelated")),
        other => panic!("expected Unresolvable, got {:?}", other.map(|_| ())),
    }
}
