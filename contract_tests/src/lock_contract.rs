//! Lock contract: mutual exclusion under stress and independence of domains.
