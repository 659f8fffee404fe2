use crucible_di::{Constructor, DiError, Injectable, Lifetime, Resolver, ServiceCollection, key_of};
use std::sync::Arc;

struct Ping {
    #[allow(dead_code)]
    pong: Arc<Pong>,
}

struct Pong {
    #[allow(dead_code)]
    ping: Arc<Ping>,
}

impl Injectable for Ping {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(vec![key_of::<Pong>()], |r| {
            Ok(Ping {
                pong: r.get::<Pong>()?,
            })
        })]
    }
}

impl Injectable for Pong {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(vec![key_of::<Ping>()], |r| {
            Ok(Pong {
                ping: r.get::<Ping>()?,
            })
        })]
    }
}

#[test]
fn test_two_type_cycle_fails_with_circular() {
    let mut sc = ServiceCollection::new();
    sc.register::<Ping>(Lifetime::Transient);
    sc.register::<Pong>(Lifetime::Transient);

    let sp = sc.build();

    match sp.get::<Ping>() {
        Err(DiError::Circular(path)) => {
            assert_eq!(path.len(), 3);
            assert!(path[0].contains("Ping"));
            assert!(path[1].contains("Pong"));
            assert!(path[2].contains("Ping"));
        }
        other => panic!("expected Circular, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_self_circular_dependency() {
    struct SelfReferencing;

    impl Injectable for SelfReferencing {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(vec![key_of::<SelfReferencing>()], |r| {
                let _ = r.get::<SelfReferencing>()?;
                Ok(SelfReferencing)
            })]
        }
    }

    let mut sc = ServiceCollection::new();
    sc.register::<SelfReferencing>(Lifetime::Transient);

    let sp = sc.build();

    match sp.get::<SelfReferencing>() {
        Err(DiError::Circular(path)) => {
            assert_eq!(path.len(), 2);
            assert!(path[0].contains("SelfReferencing"));
            assert!(path[1].contains("SelfReferencing"));
        }
        other => panic!("expected Circular, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_three_level_cycle_reports_full_path() {
    struct X;
    struct Y;
    struct Z;

    impl Injectable for X {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(vec![key_of::<Y>()], |r| {
                let _ = r.get::<Y>()?;
                Ok(X)
            })]
        }
    }

    impl Injectable for Y {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(vec![key_of::<Z>()], |r| {
                let _ = r.get::<Z>()?;
                Ok(Y)
            })]
        }
    }

    impl Injectable for Z {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(vec![key_of::<X>()], |r| {
                let _ = r.get::<X>()?;
                Ok(Z)
            })]
        }
    }

    let mut sc = ServiceCollection::new();
    sc.register::<X>(Lifetime::Singleton);
    sc.register::<Y>(Lifetime::Singleton);
    sc.register::<Z>(Lifetime::Singleton);

    let sp = sc.build();

    match sp.get::<X>() {
        Err(DiError::Circular(path)) => {
            assert_eq!(path.len(), 4);
            assert!(path[0].contains("X"));
            assert!(path[1].contains("Y"));
            assert!(path[2].contains("Z"));
            assert!(path[3].contains("X"));
        }
        other => panic!("expected Circular, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_cycle_through_interface_fails_instead_of_hanging() {
    use crucible_di::InterfaceBinding;

    trait Loop: Send + Sync {}

    struct Knot {
        #[allow(dead_code)]
        inner: Arc<dyn Loop>,
    }
    impl Loop for Knot {}

    impl Injectable for Knot {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(vec![crucible_di::key_of_trait::<dyn Loop>()], |r| {
                Ok(Knot {
                    inner: r.get_trait::<dyn Loop>()?,
                })
            })]
        }
        fn interfaces() -> Vec<InterfaceBinding> {
            vec![InterfaceBinding::new::<Self, dyn Loop>(|s| s)]
        }
    }

    let mut sc = ServiceCollection::new();
    sc.register::<Knot>(Lifetime::Singleton);

    let sp = sc.build();

    // Knot -> dyn Loop -> Knot must error, not deadlock on the
    // singleton cell
    match sp.get::<Knot>() {
        Err(DiError::Circular(path)) => {
            assert!(path.iter().any(|n| n.contains("Knot")));
            assert!(path.iter().any(|n| n.contains("Loop")));
        }
        other => panic!("expected Circular, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_cycle_failure_does_not_poison_the_thread() {
    let mut sc = ServiceCollection::new();
    sc.register::<Ping>(Lifetime::Transient);
    sc.register::<Pong>(Lifetime::Transient);
    sc.add_singleton(99u64);

    let sp = sc.build();

    assert!(matches!(sp.get::<Ping>(), Err(DiError::Circular(_))));

    // Same thread, unrelated service: must resolve
    assert_eq!(*sp.get_required::<u64>(), 99);

    // Same thread, same cyclic service: still Circular, not garbage
    assert!(matches!(sp.get::<Ping>(), Err(DiError::Circular(_))));
}

#[test]
fn test_cycle_failure_does_not_poison_singleton_cells() {
    struct Root {
        #[allow(dead_code)]
        dep: Arc<u16>,
    }

    impl Injectable for Root {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(vec![key_of::<u16>()], |r| {
                Ok(Root {
                    dep: r.get::<u16>()?,
                })
            })]
        }
    }

    let mut sc = ServiceCollection::new();
    sc.register::<Ping>(Lifetime::Singleton);
    sc.register::<Pong>(Lifetime::Singleton);
    sc.register::<Root>(Lifetime::Singleton);
    sc.add_singleton(7u16);

    let sp = sc.build();

    // A failed singleton build leaves its cell empty, not wedged
    assert!(sp.get::<Ping>().is_err());

    let a = sp.get_required::<Root>();
    let b = sp.get_required::<Root>();
    assert!(Arc::ptr_eq(&a, &b));
}
