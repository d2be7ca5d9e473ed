//! Store contract: commit visibility across handles, processes, and erases.
