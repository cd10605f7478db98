#[macro_export]
macro_rules! assert_eq_unordered {
    ($actual:expr, $expect:expr) => {
        let mut vals = Vec::new();

        for val in $actual {
            vals.push(val);
        }

        for val in $expect {
            let Some(index) = vals.iter().position(|v| *v == val) else {
                panic!("`{:#?}` missing", val);
            };
            vals.remove(index);
        }

        assert!(vals.is_empty(), "unexpected values: {:#?}", vals);
    };
}

/// Builds a fixture row from plain values.
#[macro_export]
macro_rules! row {
    ( $( $value:expr ),* $(,)? ) => {
        vec![ $( plait::Value::from($value) ),* ]
    };
}

#[macro_export]
macro_rules! models {
    (
        $( $model:expr ),* $(,)?
    ) => {{
        vec![ $( $model ),* ]
    }};
}

#[macro_export]
macro_rules! tests {
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+
    ) => {
        #[cfg(feature = "memory")]
        mod memory {
            $(
                #[test]
                $( #[$attrs] )*
                fn $f() {
                    let mut test = $crate::DbTest::new(
                        Box::new($crate::db::memory::SetupMemory::new())
                    );

                    test.run_test(move |test| Box::pin(async move {
                        super::$f(test).await;
                    }));
                }
            )*
        }

        #[cfg(feature = "sqlite")]
        mod sqlite {
            $(
                #[test]
                $( #[$attrs] )*
                fn $f() {
                    let mut test = $crate::DbTest::new(
                        Box::new($crate::db::sqlite::SetupSqlite::new())
                    );

                    test.run_test(move |test| Box::pin(async move {
                        super::$f(test).await;
                    }));
                }
            )*
        }
    };
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident,
        )+
    ) => {
        $crate::tests!( $(
            $( #[$attrs] )*
            $f
        ),+ );
    }
}
